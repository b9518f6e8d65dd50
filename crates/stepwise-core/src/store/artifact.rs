//! Artifact store trait definition.

use stepwise_types::error::ArtifactError;
use stepwise_types::run::RunRecord;
use uuid::Uuid;

/// Content-addressed storage for large binary payloads.
///
/// Blobs live outside the checkpoint, scoped by run and named by a hash of
/// their content. Steps save a blob and store the returned reference in
/// `RunRecord::raw_artifact_ref`.
pub trait ArtifactStore: Send + Sync {
    /// Store `content` for `run_id` and return its reference.
    ///
    /// Saving identical bytes twice yields the same reference and writes at
    /// most once.
    fn save_raw_artifact(
        &self,
        run_id: &Uuid,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<String, ArtifactError>> + Send;

    /// Resolve `record.raw_artifact_ref` to bytes.
    ///
    /// Returns `ArtifactError::Missing` if the reference is unset or the blob
    /// is absent.
    fn load_raw_artifact(
        &self,
        record: &RunRecord,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, ArtifactError>> + Send;
}
