//! Engine configuration types.
//!
//! `EngineConfig` is the top-level `config.toml` found in the data directory.
//! Every field has a default, so an empty or missing file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::policy::ResiliencePolicy;

/// Top-level configuration for the orchestration engine and its stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one `{run_id}.json` checkpoint per run.
    /// Relative paths resolve against the data directory.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// Directory holding per-run artifact subdirectories.
    /// Relative paths resolve against the data directory.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Policy applied by agents that do not configure their own.
    #[serde(default)]
    pub default_policy: ResiliencePolicy,

    /// Forward progress notifications to the tracing sink.
    #[serde(default)]
    pub enable_tracing: bool,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: default_checkpoint_dir(),
            artifact_dir: default_artifact_dir(),
            default_policy: ResiliencePolicy::default(),
            enable_tracing: false,
        }
    }
}
