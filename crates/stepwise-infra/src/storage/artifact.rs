//! Content-addressed filesystem artifact store.
//!
//! Implements the `ArtifactStore` trait from `stepwise-core`. Blobs are stored
//! at `{dir}/{run_id}/raw_{hash16}.bin`, where `hash16` is the first 16 hex
//! characters of the content digest. Identical bytes always map to the same
//! file, so a repeated save is a no-op.

use std::path::{Path, PathBuf};

use stepwise_core::hash::ContentHasher;
use stepwise_core::store::ArtifactStore;
use stepwise_types::error::ArtifactError;
use stepwise_types::run::RunRecord;
use uuid::Uuid;

use crate::crypto::hash::Sha256ContentHasher;
use crate::filesystem::write_atomic;

/// Number of digest characters kept in an artifact file name.
const HASH_PREFIX_LEN: usize = 16;

/// Artifact store rooted at a directory, with one subdirectory per run.
#[derive(Debug, Clone)]
pub struct FsArtifactStore<H = Sha256ContentHasher> {
    dir: PathBuf,
    hasher: H,
}

impl FsArtifactStore {
    /// Create a store that addresses blobs by SHA-256.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_hasher(dir, Sha256ContentHasher::new())
    }
}

impl<H: ContentHasher> FsArtifactStore<H> {
    pub fn with_hasher(dir: impl Into<PathBuf>, hasher: H) -> Self {
        Self {
            dir: dir.into(),
            hasher,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory holding every blob of one run.
    pub fn run_dir(&self, run_id: &Uuid) -> PathBuf {
        self.dir.join(run_id.to_string())
    }

    /// Reference (file name) under which `content` is stored.
    pub fn reference_for(&self, content: &[u8]) -> String {
        let hash = self.hasher.compute_hash(content);
        let prefix = hash.get(..HASH_PREFIX_LEN).unwrap_or(&hash);
        format!("raw_{prefix}.bin")
    }
}

impl<H: ContentHasher> ArtifactStore for FsArtifactStore<H> {
    async fn save_raw_artifact(
        &self,
        run_id: &Uuid,
        content: &[u8],
    ) -> Result<String, ArtifactError> {
        let reference = self.reference_for(content);
        let run_dir = self.run_dir(run_id);
        let path = run_dir.join(&reference);

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(run_id = %run_id, reference = %reference, "artifact already stored");
            return Ok(reference);
        }

        tokio::fs::create_dir_all(&run_dir).await?;
        write_atomic(&path, content).await?;

        tracing::debug!(
            run_id = %run_id,
            reference = %reference,
            bytes = content.len(),
            "artifact stored"
        );
        Ok(reference)
    }

    async fn load_raw_artifact(&self, record: &RunRecord) -> Result<Vec<u8>, ArtifactError> {
        let missing = |detail: String| ArtifactError::Missing {
            run_id: record.run_id,
            detail,
        };

        let Some(reference) = record.raw_artifact_ref.as_deref() else {
            return Err(missing("no artifact reference set".to_string()));
        };

        // References are bare file names inside the run directory.
        if reference.is_empty() || reference.contains(['/', '\\']) || reference == ".." {
            return Err(missing(format!("invalid artifact reference '{reference}'")));
        }

        let path = self.run_dir(&record.run_id).join(reference);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(missing(format!("{reference} not found")))
            }
            Err(err) => Err(ArtifactError::Io(err)),
        }
    }
}
