use thiserror::Error;
use uuid::Uuid;

/// Errors from checkpoint store operations.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The durable write or read itself failed. Never swallowed: a lost
    /// checkpoint breaks resumability.
    #[error("checkpoint I/O error for run {run_id}: {source}")]
    Io {
        run_id: Uuid,
        #[source]
        source: std::io::Error,
    },

    /// No checkpoint exists for the run.
    #[error("no checkpoint found for run {0}")]
    NotFound(Uuid),

    /// The checkpoint exists but cannot be parsed or fails validation.
    #[error("corrupt checkpoint for run {run_id}: {reason}")]
    Corrupt { run_id: Uuid, reason: String },

    /// The checkpoint directory itself could not be read.
    #[error("checkpoint directory error: {0}")]
    Directory(#[source] std::io::Error),

    /// The record could not be serialized.
    #[error("failed to serialize run {run_id}: {reason}")]
    Serialize { run_id: Uuid, reason: String },
}

/// Errors from artifact store operations.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The run has no artifact reference, or the referenced blob is absent.
    #[error("raw artifact missing for run {run_id}: {detail}")]
    Missing { run_id: Uuid, detail: String },

    /// Reading or writing the blob failed.
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
}
