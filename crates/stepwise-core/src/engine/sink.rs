//! Observability sink: best-effort progress notifications from the engine.
//!
//! Notifications never influence execution. The engine logs a failed
//! notification at `warn` and carries on.

use stepwise_types::run::{AttemptStatus, RunRecord};

use crate::step::StepOwner;

/// A notification could not be delivered.
#[derive(Debug, Clone, thiserror::Error)]
#[error("sink error: {0}")]
pub struct SinkError(pub String);

/// Receiver of run, step, and attempt lifecycle events.
///
/// Every method defaults to a no-op so implementors only override what they
/// forward. `score` is 1.0 for success and 0.0 for failure.
pub trait ObservabilitySink: Send + Sync {
    fn run_started(&self, _record: &RunRecord) -> Result<(), SinkError> {
        Ok(())
    }

    fn run_finished(&self, _record: &RunRecord, _score: f64) -> Result<(), SinkError> {
        Ok(())
    }

    fn step_started(
        &self,
        _record: &RunRecord,
        _step_name: &str,
        _owner: &dyn StepOwner,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn step_finished(
        &self,
        _record: &RunRecord,
        _step_name: &str,
        _status: AttemptStatus,
        _error: Option<&str>,
        _score: f64,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn attempt_started(
        &self,
        _record: &RunRecord,
        _step_name: &str,
        _attempt: u32,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn attempt_finished(
        &self,
        _record: &RunRecord,
        _step_name: &str,
        _attempt: u32,
        _status: AttemptStatus,
        _error: Option<&str>,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ObservabilitySink for NoopSink {}
