//! Checkpoint store trait definition.

use stepwise_types::error::CheckpointError;
use stepwise_types::run::RunRecord;
use uuid::Uuid;

/// Durable storage for run records.
///
/// One checkpoint represents the current state of a run; each write replaces
/// the previous one. Implementations must make a write all-or-nothing so a
/// crash never leaves a partially written canonical checkpoint behind.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait CheckpointStore: Send + Sync {
    /// Persist the full record (artifact bytes excluded), replacing any prior
    /// checkpoint for the same run.
    fn checkpoint(
        &self,
        record: &RunRecord,
    ) -> impl std::future::Future<Output = Result<(), CheckpointError>> + Send;

    /// Reload the latest checkpoint for `run_id`.
    ///
    /// Returns `CheckpointError::NotFound` when no checkpoint exists and
    /// `CheckpointError::Corrupt` when it cannot be parsed or validated.
    fn load_checkpoint(
        &self,
        run_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<RunRecord, CheckpointError>> + Send;

    /// IDs of every run with a checkpoint, sorted ascending.
    fn list_checkpoints(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Uuid>, CheckpointError>> + Send;
}
