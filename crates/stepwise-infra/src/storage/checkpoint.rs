//! Filesystem checkpoint store.
//!
//! Implements the `CheckpointStore` trait from `stepwise-core`. Each run has a
//! single pretty-printed JSON checkpoint at `{dir}/{run_id}.json`, replaced
//! atomically on every write.

use std::path::{Path, PathBuf};

use stepwise_core::store::CheckpointStore;
use stepwise_types::error::CheckpointError;
use stepwise_types::run::RunRecord;
use uuid::Uuid;

use crate::filesystem::write_atomic;

/// Checkpoint store rooted at a directory.
///
/// The directory is created on first write. A crash mid-write leaves at most
/// a stray `{run_id}.json.tmp` next to an intact canonical checkpoint.
#[derive(Debug, Clone)]
pub struct FsCheckpointStore {
    dir: PathBuf,
}

impl FsCheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical checkpoint path for a run.
    pub fn checkpoint_path(&self, run_id: &Uuid) -> PathBuf {
        self.dir.join(format!("{run_id}.json"))
    }
}

impl CheckpointStore for FsCheckpointStore {
    async fn checkpoint(&self, record: &RunRecord) -> Result<(), CheckpointError> {
        let run_id = record.run_id;
        let io = |source: std::io::Error| CheckpointError::Io { run_id, source };

        let json = serde_json::to_vec_pretty(record).map_err(|e| CheckpointError::Serialize {
            run_id,
            reason: e.to_string(),
        })?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(io)?;
        write_atomic(&self.checkpoint_path(&run_id), &json)
            .await
            .map_err(io)?;

        tracing::debug!(
            run_id = %run_id,
            status = %record.status,
            history = record.execution_history().len(),
            "checkpoint written"
        );
        Ok(())
    }

    async fn load_checkpoint(&self, run_id: &Uuid) -> Result<RunRecord, CheckpointError> {
        let path = self.checkpoint_path(run_id);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound(*run_id));
            }
            Err(source) => {
                return Err(CheckpointError::Io {
                    run_id: *run_id,
                    source,
                });
            }
        };

        let record: RunRecord =
            serde_json::from_slice(&bytes).map_err(|e| CheckpointError::Corrupt {
                run_id: *run_id,
                reason: e.to_string(),
            })?;

        validate_loaded(run_id, &record)?;
        Ok(record)
    }

    async fn list_checkpoints(&self) -> Result<Vec<Uuid>, CheckpointError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CheckpointError::Directory(err)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(CheckpointError::Directory)?
        {
            let file_name = entry.file_name();
            let Some(stem) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
            else {
                continue;
            };
            match Uuid::parse_str(stem) {
                Ok(id) => ids.push(id),
                Err(_) => {
                    tracing::debug!(file = %entry.path().display(), "skipping non-checkpoint file");
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}

/// Structural checks on a parsed checkpoint.
fn validate_loaded(run_id: &Uuid, record: &RunRecord) -> Result<(), CheckpointError> {
    let corrupt = |reason: String| CheckpointError::Corrupt {
        run_id: *run_id,
        reason,
    };

    if record.run_id != *run_id {
        return Err(corrupt(format!(
            "checkpoint holds run {} instead",
            record.run_id
        )));
    }

    for (i, log) in record.execution_history().iter().enumerate() {
        if log.step_name.is_empty() {
            return Err(corrupt(format!("history entry {i} has an empty step name")));
        }
        if log.attempt == 0 {
            return Err(corrupt(format!(
                "history entry {i} for step '{}' has attempt 0",
                log.step_name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use serde_json::json;
    use stepwise_types::run::{AttemptStatus, RunStatus};
    use tempfile::TempDir;

    fn sample_record() -> RunRecord {
        let mut context = HashMap::new();
        context.insert("arxiv_id".to_string(), json!("1706.03762"));
        let mut record = RunRecord::new("audit", context);
        record.status = RunStatus::Running;
        record.current_step = Some("parse".into());
        record.push_attempt("fetch", AttemptStatus::Running, 1, None);
        record.push_attempt("fetch", AttemptStatus::Completed, 1, None);
        record.push_attempt("parse", AttemptStatus::Running, 1, None);
        record.push_attempt("parse", AttemptStatus::Failed, 1, Some("bad xref table".into()));
        record.payload.insert("title".into(), json!("Attention Is All You Need"));
        record.raw_artifact_ref = Some("raw_0123456789abcdef.bin".into());
        record
    }

    #[tokio::test]
    async fn test_checkpoint_then_load_is_equal() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path().join("checkpoints"));
        let record = sample_record();

        store.checkpoint(&record).await.unwrap();
        let loaded = store.load_checkpoint(&record.run_id).await.unwrap();

        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_checkpoint_preserves_float_payload_values_exactly() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let mut record = sample_record();
        record.payload.insert(
            "claims".into(),
            json!([
                {"text": "BLEU improves by 2.0", "confidence": 0.10957860598549463},
                {"text": "Converges in 3 epochs", "confidence": 1.0715660391465826e-75},
                {"text": "Beats the baseline", "confidence": 0.9999999999999999},
            ]),
        );

        store.checkpoint(&record).await.unwrap();
        let loaded = store.load_checkpoint(&record.run_id).await.unwrap();

        assert_eq!(loaded, record);
        assert_eq!(
            loaded.payload["claims"][1]["confidence"].as_f64(),
            Some(1.0715660391465826e-75)
        );
    }

    #[tokio::test]
    async fn test_checkpoint_overwrites_previous_state() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let mut record = sample_record();

        store.checkpoint(&record).await.unwrap();
        record.status = RunStatus::Completed;
        record.current_step = None;
        store.checkpoint(&record).await.unwrap();

        let loaded = store.load_checkpoint(&record.run_id).await.unwrap();
        assert_eq!(loaded.status, RunStatus::Completed);
        assert!(!crate::filesystem::temp_path(&store.checkpoint_path(&record.run_id)).exists());
    }

    #[tokio::test]
    async fn test_checkpoint_file_is_named_by_run_id() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let record = sample_record();

        store.checkpoint(&record).await.unwrap();

        let path = tmp.path().join(format!("{}.json", record.run_id));
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"status\": \"RUNNING\""));
        assert!(raw.contains("\"execution_history\""));
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let id = Uuid::now_v7();

        let err = store.load_checkpoint(&id).await.unwrap_err();
        assert!(matches!(err, CheckpointError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_load_garbage_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let id = Uuid::now_v7();
        std::fs::write(store.checkpoint_path(&id), "{ not json").unwrap();

        let err = store.load_checkpoint(&id).await.unwrap_err();
        assert!(matches!(err, CheckpointError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_load_mismatched_run_id_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let record = sample_record();
        let other = Uuid::now_v7();

        let json = serde_json::to_vec(&record).unwrap();
        std::fs::write(store.checkpoint_path(&other), json).unwrap();

        let err = store.load_checkpoint(&other).await.unwrap_err();
        assert!(matches!(err, CheckpointError::Corrupt { .. }));
        assert!(err.to_string().contains("instead"));
    }

    #[tokio::test]
    async fn test_load_attempt_zero_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let mut record = RunRecord::new("audit", HashMap::new());
        record.push_attempt("fetch", AttemptStatus::Running, 0, None);
        store.checkpoint(&record).await.unwrap();

        let err = store.load_checkpoint(&record.run_id).await.unwrap_err();
        assert!(err.to_string().contains("attempt 0"));
    }

    #[tokio::test]
    async fn test_list_checkpoints_ignores_temp_and_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());

        let a = RunRecord::new("audit", HashMap::new());
        let b = RunRecord::new("audit", HashMap::new());
        store.checkpoint(&a).await.unwrap();
        store.checkpoint(&b).await.unwrap();
        std::fs::write(tmp.path().join(format!("{}.json.tmp", Uuid::now_v7())), "{").unwrap();
        std::fs::write(tmp.path().join("notes.json"), "{}").unwrap();

        let ids = store.list_checkpoints().await.unwrap();
        let mut expected = vec![a.run_id, b.run_id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_list_checkpoints_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path().join("never-created"));
        assert!(store.list_checkpoints().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkpoint_into_unwritable_location_is_io_error() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FsCheckpointStore::new(&blocker);

        let err = store.checkpoint(&sample_record()).await.unwrap_err();
        assert!(matches!(err, CheckpointError::Io { .. }));
    }
}
