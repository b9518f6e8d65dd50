//! Step trait definition.

use stepwise_types::error::ArtifactError;
use stepwise_types::run::RunRecord;

use super::owner::StepOwner;

/// A single retryable unit of work.
///
/// The engine calls `execute` once per attempt with a copy of the run record
/// and adopts the payload-class fields (`payload`, `raw_artifact_ref`) of the
/// returned record. Failure is signalled only by returning `Err`; every error
/// is treated as transient and retried per the owner's policy.
///
/// Steps run at least once per successful completion and may run again after
/// a crash, so side effects must be safe to repeat.
pub trait Step: Send + Sync {
    /// Name unique within a step list. Used to match history on resume.
    fn name(&self) -> &str;

    /// The entity that owns this step and supplies its resilience policy.
    fn owner(&self) -> &dyn StepOwner;

    /// Run the step against `record` and return the updated record.
    fn execute(
        &self,
        record: RunRecord,
    ) -> impl std::future::Future<Output = Result<RunRecord, StepError>> + Send;
}

/// Failure raised from a step's `execute`.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Plain failure with a message.
    #[error("{0}")]
    Failed(String),

    /// A referenced artifact could not be loaded or stored.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Any other error bubbled up from business logic.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepError {
    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed(message.into())
    }

    /// Message recorded in the attempt history, including any context chain.
    pub fn history_message(&self) -> String {
        match self {
            StepError::Other(err) => format!("{err:#}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn step_error_display_is_the_message() {
        let err = StepError::failed("HTTP 503 from export.arxiv.org");
        assert_eq!(err.to_string(), "HTTP 503 from export.arxiv.org");
    }

    #[test]
    fn step_error_wraps_artifact_and_anyhow() {
        let err: StepError = ArtifactError::Missing {
            run_id: Uuid::nil(),
            detail: "no reference set".into(),
        }
        .into();
        assert!(matches!(err, StepError::Artifact(_)));
        assert!(err.to_string().contains("no reference set"));

        let err: StepError = anyhow::anyhow!("parse error at page 3").into();
        assert!(matches!(err, StepError::Other(_)));
        assert_eq!(err.to_string(), "parse error at page 3");
    }

    #[test]
    fn history_message_keeps_the_context_chain() {
        let source = anyhow::anyhow!("unexpected token at byte 812");
        let err: StepError = source.context("failed to parse claims").into();

        assert_eq!(err.to_string(), "failed to parse claims");
        assert_eq!(
            err.history_message(),
            "failed to parse claims: unexpected token at byte 812"
        );
        assert_eq!(StepError::failed("timeout").history_message(), "timeout");
    }
}
