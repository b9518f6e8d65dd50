//! `stepwise runs` and `stepwise show`: list runs and display one run's history.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use stepwise_core::store::CheckpointStore;
use stepwise_infra::storage::FsCheckpointStore;
use stepwise_types::run::RunRecord;

use super::{StatusFilter, format_attempt_status, format_run_status, parse_run_id, short_id};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Load every readable checkpoint matching `status`, newest first.
///
/// Unreadable checkpoints are skipped with a warning so one corrupt file does
/// not hide the rest.
pub async fn load_runs(
    store: &FsCheckpointStore,
    status: Option<StatusFilter>,
    limit: usize,
) -> Result<Vec<RunRecord>> {
    let mut ids = store
        .list_checkpoints()
        .await
        .context("Failed to list checkpoints")?;
    // UUIDv7 sorts by creation time.
    ids.reverse();

    let mut runs = Vec::new();
    for id in ids {
        if runs.len() >= limit {
            break;
        }
        match store.load_checkpoint(&id).await {
            Ok(record) => {
                if status.is_none_or(|filter| filter.matches(record.status)) {
                    runs.push(record);
                }
            }
            Err(e) => tracing::warn!(run_id = %id, "skipping unreadable checkpoint: {e}"),
        }
    }
    Ok(runs)
}

pub async fn list_runs(
    state: &AppState,
    status: Option<StatusFilter>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let runs = load_runs(&state.checkpoints, status, limit).await?;

    if json {
        let out: Vec<_> = runs
            .iter()
            .map(|r| {
                serde_json::json!({
                    "run_id": r.run_id.to_string(),
                    "workflow_name": r.workflow_name,
                    "status": r.status.to_string(),
                    "current_step": r.current_step,
                    "attempts": r.execution_history().len(),
                    "updated_at": r.last_attempt().map(|l| l.timestamp.to_rfc3339()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!();
        println!(
            "  No runs found in {}.",
            style(state.config.checkpoint_dir.display()).dim()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Run ID").fg(Color::Cyan),
            Cell::new("Workflow"),
            Cell::new("Status"),
            Cell::new("Step"),
            Cell::new("Entries"),
            Cell::new("Updated"),
        ]);

    for r in &runs {
        let updated = r
            .last_attempt()
            .map(|l| l.timestamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(short_id(&r.run_id)),
            Cell::new(&r.workflow_name),
            format_run_status(r.status),
            Cell::new(r.current_step.as_deref().unwrap_or("-")),
            Cell::new(r.execution_history().len()),
            Cell::new(updated),
        ]);
    }

    println!();
    println!("  Runs in {}", style(state.data_dir.display()).cyan());
    println!();
    println!("{table}");
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// Show
// ---------------------------------------------------------------------------

pub async fn show_run(state: &AppState, run_id_str: &str, json: bool) -> Result<()> {
    let run_id = parse_run_id(run_id_str)?;
    let record = state
        .checkpoints
        .load_checkpoint(&run_id)
        .await
        .with_context(|| format!("Failed to load run '{run_id_str}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!();
    println!(
        "  Run {} ({})",
        style(record.run_id).cyan(),
        style(&record.workflow_name).bold()
    );
    println!("  Status:       {}", record.status);
    println!(
        "  Current step: {}",
        record.current_step.as_deref().unwrap_or("-")
    );
    println!(
        "  Artifact:     {}",
        record.raw_artifact_ref.as_deref().unwrap_or("-")
    );
    println!("  Payload keys: {}", record.payload.len());
    println!();

    if record.execution_history().is_empty() {
        println!("  No attempts recorded.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Step"),
            Cell::new("Status"),
            Cell::new("Attempt"),
            Cell::new("Time"),
            Cell::new("Message"),
        ]);

    for (i, log) in record.execution_history().iter().enumerate() {
        let message = log
            .message
            .as_ref()
            .map(|m| m.chars().take(60).collect::<String>())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&log.step_name),
            format_attempt_status(log.status),
            Cell::new(log.attempt),
            Cell::new(log.timestamp.format("%H:%M:%S").to_string()),
            Cell::new(message),
        ]);
    }

    println!("{table}");

    if let Some(failure) = record.last_failure() {
        println!();
        println!(
            "  {} Last failure in '{}' (attempt {}): {}",
            style("✗").red(),
            failure.step_name,
            failure.attempt,
            failure.message.as_deref().unwrap_or("no message")
        );
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use stepwise_types::run::RunStatus;
    use tempfile::TempDir;

    async fn seed(store: &FsCheckpointStore, status: RunStatus) -> RunRecord {
        // Keep UUIDv7 timestamps distinct so ordering is deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut record = RunRecord::new("audit", HashMap::new());
        record.status = status;
        store.checkpoint(&record).await.unwrap();
        record
    }

    #[tokio::test]
    async fn load_runs_is_newest_first_and_limited() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let first = seed(&store, RunStatus::Completed).await;
        let second = seed(&store, RunStatus::Failed).await;
        let third = seed(&store, RunStatus::Running).await;

        let runs = load_runs(&store, None, 2).await.unwrap();
        let ids: Vec<_> = runs.iter().map(|r| r.run_id).collect();
        assert_eq!(ids, vec![third.run_id, second.run_id]);
        assert!(!ids.contains(&first.run_id));
    }

    #[tokio::test]
    async fn load_runs_filters_by_status() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        seed(&store, RunStatus::Completed).await;
        let failed = seed(&store, RunStatus::Failed).await;

        let runs = load_runs(&store, Some(StatusFilter::Failed), 20).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, failed.run_id);
    }

    #[tokio::test]
    async fn load_runs_skips_corrupt_checkpoints() {
        let tmp = TempDir::new().unwrap();
        let store = FsCheckpointStore::new(tmp.path());
        let good = seed(&store, RunStatus::Completed).await;
        let broken = uuid::Uuid::now_v7();
        std::fs::write(store.checkpoint_path(&broken), "{ truncated").unwrap();

        let runs = load_runs(&store, None, 20).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, good.run_id);
    }
}
