//! Engine configuration loader for stepwise.
//!
//! Reads `config.toml` from the data directory (`~/.stepwise/` in production)
//! and deserializes it into [`EngineConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use stepwise_types::config::EngineConfig;
use stepwise_types::policy::ResiliencePolicy;

/// Load engine configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`EngineConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
/// - Invalid `default_policy`: logs a warning and keeps the default policy.
///
/// Relative store directories are resolved against `data_dir`.
pub async fn load_engine_config(data_dir: &Path) -> EngineConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => Some(content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            None
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            None
        }
    };

    let mut config = match content.map(|c| toml::from_str::<EngineConfig>(&c)) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            EngineConfig::default()
        }
        None => EngineConfig::default(),
    };

    if let Err(err) = config.default_policy.validate() {
        tracing::warn!(
            "Invalid default_policy in {}: {err}, using the standard policy",
            config_path.display()
        );
        config.default_policy = ResiliencePolicy::default();
    }

    resolve_dirs(config, data_dir)
}

/// Make relative store directories absolute by joining them onto `data_dir`.
pub fn resolve_dirs(mut config: EngineConfig, data_dir: &Path) -> EngineConfig {
    if config.checkpoint_dir.is_relative() {
        config.checkpoint_dir = data_dir.join(&config.checkpoint_dir);
    }
    if config.artifact_dir.is_relative() {
        config.artifact_dir = data_dir.join(&config.artifact_dir);
    }
    config
}
