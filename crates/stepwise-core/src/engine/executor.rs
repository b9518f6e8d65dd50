//! Orchestration engine: sequential step execution with durable checkpointing.
//!
//! The `OrchestrationEngine` drives a run through an ordered list of steps.
//! Every attempt transition is appended to the run's history and checkpointed
//! before the engine moves on, so a crash at any point resumes from the last
//! durable state.
//!
//! # Execution flow
//!
//! 1. Validate step policies and names.
//! 2. Return terminal runs unchanged; otherwise mark the run `RUNNING`.
//! 3. Detect the resume point from the history.
//! 4. For each remaining step: checkpoint `RUNNING(n)` -> execute -> checkpoint
//!    `COMPLETED(n)` or `FAILED(n)`, backing off between failed attempts.
//! 5. Mark the run `COMPLETED` or `FAILED` and write the final checkpoint.

use std::collections::HashSet;
use std::sync::Arc;

use stepwise_types::error::CheckpointError;
use stepwise_types::policy::PolicyError;
use stepwise_types::run::{AttemptStatus, RunRecord, RunStatus};

use crate::step::BoxStep;
use crate::store::CheckpointStore;

use super::backoff::backoff_delay;
use super::resume::{ResumePoint, next_base_attempt, resume_point};
use super::sink::{NoopSink, ObservabilitySink, SinkError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that abort `run_workflow`.
///
/// A step exhausting its retries is not an error: the run comes back with
/// `status = FAILED`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A checkpoint write failed. The run cannot continue without durability.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("invalid resilience policy for step '{step_name}': {source}")]
    InvalidPolicy {
        step_name: String,
        #[source]
        source: PolicyError,
    },

    #[error("duplicate step name '{0}'")]
    DuplicateStep(String),
}

/// Outcome of a step that did not complete.
#[derive(Debug, thiserror::Error)]
enum StepFailure {
    #[error("step failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

// ---------------------------------------------------------------------------
// OrchestrationEngine
// ---------------------------------------------------------------------------

/// Runs workflows step by step against a checkpoint store.
///
/// One engine may drive many runs concurrently, but a single run must only
/// be driven by one caller at a time.
pub struct OrchestrationEngine<S: CheckpointStore> {
    store: S,
    sink: Arc<dyn ObservabilitySink>,
}

impl<S: CheckpointStore> OrchestrationEngine<S> {
    /// Create an engine that discards observability notifications.
    pub fn new(store: S) -> Self {
        Self::with_sink(store, Arc::new(NoopSink))
    }

    pub fn with_sink(store: S, sink: Arc<dyn ObservabilitySink>) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drive `record` through `steps`, resuming from its history.
    ///
    /// Returns the final record with status `COMPLETED` or `FAILED`. Only a
    /// checkpoint failure or an invalid step list produces `Err`.
    pub async fn run_workflow(
        &self,
        steps: &[BoxStep],
        mut record: RunRecord,
    ) -> Result<RunRecord, EngineError> {
        validate_steps(steps)?;

        if record.is_terminal() {
            tracing::info!(
                run_id = %record.run_id,
                status = %record.status,
                "run already finished, nothing to do"
            );
            return Ok(record);
        }

        record.status = RunStatus::Running;
        self.notify("run_started", |sink| sink.run_started(&record));

        let names: Vec<&str> = steps.iter().map(BoxStep::name).collect();
        let point = resume_point(&names[..], &record);
        match &point {
            ResumePoint::Start => {}
            ResumePoint::Mismatch { step_name } => {
                tracing::warn!(
                    run_id = %record.run_id,
                    last_step = %step_name,
                    "last recorded step is not in this workflow, restarting from the first step"
                );
            }
            ResumePoint::After { step_name, .. } | ResumePoint::Retry { step_name, .. } => {
                tracing::info!(
                    run_id = %record.run_id,
                    last_step = %step_name,
                    start_index = point.start_index(),
                    "resuming run"
                );
            }
        }

        tracing::info!(
            run_id = %record.run_id,
            workflow = %record.workflow_name,
            steps = steps.len(),
            "workflow started"
        );

        for step in &steps[point.start_index()..] {
            record.current_step = Some(step.name().to_string());
            self.notify("step_started", |sink| {
                sink.step_started(&record, step.name(), step.owner())
            });

            match self.execute_step_with_resilience(step, &mut record).await {
                Ok(()) => {
                    self.notify("step_finished", |sink| {
                        sink.step_finished(&record, step.name(), AttemptStatus::Completed, None, 1.0)
                    });
                }
                Err(StepFailure::Exhausted {
                    attempts,
                    last_error,
                }) => {
                    record.status = RunStatus::Failed;
                    self.store.checkpoint(&record).await?;

                    tracing::error!(
                        run_id = %record.run_id,
                        step = %step.name(),
                        attempts,
                        error = %last_error,
                        "step exhausted its retries, run failed"
                    );
                    self.notify("step_finished", |sink| {
                        sink.step_finished(
                            &record,
                            step.name(),
                            AttemptStatus::Failed,
                            Some(&last_error),
                            0.0,
                        )
                    });
                    self.notify("run_finished", |sink| sink.run_finished(&record, 0.0));
                    return Ok(record);
                }
                Err(StepFailure::Checkpoint(err)) => return Err(err.into()),
            }
        }

        record.status = RunStatus::Completed;
        record.current_step = None;
        self.store.checkpoint(&record).await?;

        tracing::info!(
            run_id = %record.run_id,
            workflow = %record.workflow_name,
            "workflow completed"
        );
        self.notify("run_finished", |sink| sink.run_finished(&record, 1.0));

        Ok(record)
    }

    /// Run one step until it succeeds or its retry budget is spent.
    ///
    /// Attempt numbers continue from the step's history, so the budget is
    /// shared across process restarts.
    async fn execute_step_with_resilience(
        &self,
        step: &BoxStep,
        record: &mut RunRecord,
    ) -> Result<(), StepFailure> {
        let name = step.name();
        let policy = step.owner().resilience_policy();
        let mut attempt = next_base_attempt(record, name);

        if attempt > policy.max_retries {
            let last_error = record
                .last_attempt_for(name)
                .and_then(|log| log.message.clone())
                .unwrap_or_else(|| "interrupted during final attempt".to_string());
            return Err(StepFailure::Exhausted {
                attempts: attempt - 1,
                last_error,
            });
        }

        loop {
            record.push_attempt(name, AttemptStatus::Running, attempt, None);
            self.store.checkpoint(record).await?;
            self.notify("attempt_started", |sink| {
                sink.attempt_started(record, name, attempt)
            });

            tracing::debug!(
                run_id = %record.run_id,
                step = %name,
                attempt,
                max_retries = policy.max_retries,
                "executing step"
            );

            match step.execute(record.clone()).await {
                Ok(output) => {
                    record.adopt_step_output(output);
                    record.push_attempt(name, AttemptStatus::Completed, attempt, None);
                    self.store.checkpoint(record).await?;
                    self.notify("attempt_finished", |sink| {
                        sink.attempt_finished(record, name, attempt, AttemptStatus::Completed, None)
                    });

                    tracing::info!(run_id = %record.run_id, step = %name, attempt, "step completed");
                    return Ok(());
                }
                Err(err) => {
                    let message = err.history_message();
                    record.push_attempt(name, AttemptStatus::Failed, attempt, Some(message.clone()));
                    self.store.checkpoint(record).await?;
                    self.notify("attempt_finished", |sink| {
                        sink.attempt_finished(
                            record,
                            name,
                            attempt,
                            AttemptStatus::Failed,
                            Some(&message),
                        )
                    });

                    if attempt >= policy.max_retries {
                        return Err(StepFailure::Exhausted {
                            attempts: attempt,
                            last_error: message,
                        });
                    }

                    let delay = backoff_delay(policy, attempt);
                    tracing::warn!(
                        run_id = %record.run_id,
                        step = %name,
                        attempt,
                        error = %message,
                        delay_ms = delay.as_millis() as u64,
                        "step attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Deliver a notification, logging and dropping any sink failure.
    fn notify(
        &self,
        event: &'static str,
        send: impl FnOnce(&dyn ObservabilitySink) -> Result<(), SinkError>,
    ) {
        if let Err(err) = send(self.sink.as_ref()) {
            tracing::warn!(event, error = %err, "observability notification failed");
        }
    }
}

/// Reject invalid policies and duplicate step names before any side effect.
fn validate_steps(steps: &[BoxStep]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(steps.len());
    for step in steps {
        if !seen.insert(step.name()) {
            return Err(EngineError::DuplicateStep(step.name().to_string()));
        }
        step.owner()
            .resilience_policy()
            .validate()
            .map_err(|source| EngineError::InvalidPolicy {
                step_name: step.name().to_string(),
                source,
            })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
