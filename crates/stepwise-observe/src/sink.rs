//! `TracingSink`: forwards engine lifecycle notifications as tracing events.
//!
//! Events carry dotted `workflow.*` fields so an OpenTelemetry bridge or a
//! JSON formatter can group them by run. Run and step outcomes carry a score
//! (1.0 success, 0.0 failure); step starts carry the owner's policy summary.

use std::sync::Arc;

use stepwise_core::engine::{NoopSink, ObservabilitySink, SinkError};
use stepwise_core::step::StepOwner;
use stepwise_types::config::EngineConfig;
use stepwise_types::run::{AttemptStatus, RunRecord};

/// Event target for every notification, so they can be filtered as a group.
pub const TARGET: &str = "stepwise::observe";

/// Pick the sink for an engine: `TracingSink` when `enable_tracing` is set,
/// otherwise `NoopSink`.
pub fn sink_for(config: &EngineConfig) -> Arc<dyn ObservabilitySink> {
    if config.enable_tracing {
        Arc::new(TracingSink::new())
    } else {
        Arc::new(NoopSink)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ObservabilitySink for TracingSink {
    fn run_started(&self, record: &RunRecord) -> Result<(), SinkError> {
        tracing::info!(
            target: TARGET,
            {
                workflow.run_id = %record.run_id,
                workflow.name = %record.workflow_name,
                workflow.history_len = record.execution_history().len(),
            },
            "run started"
        );
        Ok(())
    }

    fn run_finished(&self, record: &RunRecord, score: f64) -> Result<(), SinkError> {
        tracing::info!(
            target: TARGET,
            {
                workflow.run_id = %record.run_id,
                workflow.name = %record.workflow_name,
                workflow.status = %record.status,
                workflow.score = score,
            },
            "run finished"
        );
        Ok(())
    }

    fn step_started(
        &self,
        record: &RunRecord,
        step_name: &str,
        owner: &dyn StepOwner,
    ) -> Result<(), SinkError> {
        tracing::info!(
            target: TARGET,
            {
                workflow.run_id = %record.run_id,
                workflow.step = step_name,
                workflow.owner = owner.name(),
                workflow.policy = %owner.describe_policy(),
            },
            "step started"
        );
        Ok(())
    }

    fn step_finished(
        &self,
        record: &RunRecord,
        step_name: &str,
        status: AttemptStatus,
        error: Option<&str>,
        score: f64,
    ) -> Result<(), SinkError> {
        match error {
            Some(error) => tracing::warn!(
                target: TARGET,
                {
                    workflow.run_id = %record.run_id,
                    workflow.step = step_name,
                    workflow.status = %status,
                    workflow.score = score,
                    error,
                },
                "step finished"
            ),
            None => tracing::info!(
                target: TARGET,
                {
                    workflow.run_id = %record.run_id,
                    workflow.step = step_name,
                    workflow.status = %status,
                    workflow.score = score,
                },
                "step finished"
            ),
        }
        Ok(())
    }

    fn attempt_started(
        &self,
        record: &RunRecord,
        step_name: &str,
        attempt: u32,
    ) -> Result<(), SinkError> {
        tracing::debug!(
            target: TARGET,
            {
                workflow.run_id = %record.run_id,
                workflow.step = step_name,
                workflow.attempt = attempt,
            },
            "attempt started"
        );
        Ok(())
    }

    fn attempt_finished(
        &self,
        record: &RunRecord,
        step_name: &str,
        attempt: u32,
        status: AttemptStatus,
        error: Option<&str>,
    ) -> Result<(), SinkError> {
        tracing::debug!(
            target: TARGET,
            {
                workflow.run_id = %record.run_id,
                workflow.step = step_name,
                workflow.attempt = attempt,
                workflow.status = %status,
                error = error.unwrap_or(""),
            },
            "attempt finished"
        );
        Ok(())
    }
}
