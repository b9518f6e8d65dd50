//! `stepwise artifact`: copy a run's raw artifact out of the store.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use stepwise_core::store::{ArtifactStore, CheckpointStore};

use super::parse_run_id;
use crate::state::AppState;

pub async fn export_artifact(
    state: &AppState,
    run_id_str: &str,
    out: &Path,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let run_id = parse_run_id(run_id_str)?;
    let record = state
        .checkpoints
        .load_checkpoint(&run_id)
        .await
        .with_context(|| format!("Failed to load run '{run_id_str}'"))?;

    let bytes = state
        .artifacts
        .load_raw_artifact(&record)
        .await
        .with_context(|| format!("Failed to load artifact for run '{run_id_str}'"))?;

    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    if json {
        let summary = serde_json::json!({
            "run_id": record.run_id.to_string(),
            "reference": record.raw_artifact_ref,
            "bytes": bytes.len(),
            "path": out.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Wrote {} bytes to {}",
            style("✓").green().bold(),
            bytes.len(),
            style(out.display()).cyan()
        );
        println!();
    }

    Ok(())
}
