//! Application state wiring the filesystem stores to the loaded config.

use std::path::PathBuf;

use stepwise_infra::config::load_engine_config;
use stepwise_infra::filesystem::resolve_data_dir;
use stepwise_infra::storage::{FsArtifactStore, FsCheckpointStore};
use stepwise_types::config::EngineConfig;

/// Stores and configuration shared by every command.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: EngineConfig,
    pub checkpoints: FsCheckpointStore,
    pub artifacts: FsArtifactStore,
}

impl AppState {
    /// Resolve the data directory, load `config.toml`, and open the stores.
    ///
    /// Nothing is created on disk; a fresh data directory simply has no runs.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);
        let config = load_engine_config(&data_dir).await;

        tracing::debug!(
            data_dir = %data_dir.display(),
            checkpoint_dir = %config.checkpoint_dir.display(),
            artifact_dir = %config.artifact_dir.display(),
            "state initialized"
        );

        Ok(Self {
            checkpoints: FsCheckpointStore::new(config.checkpoint_dir.clone()),
            artifacts: FsArtifactStore::new(config.artifact_dir.clone()),
            data_dir,
            config,
        })
    }
}
