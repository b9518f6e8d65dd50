//! CLI command definitions for the `stepwise` binary.
//!
//! Uses clap derive macros for argument parsing. Every command is read-only.

pub mod artifact;
pub mod runs;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, Color};
use stepwise_types::run::{AttemptStatus, RunStatus};
use uuid::Uuid;

/// Inspect durable workflow runs.
#[derive(Parser)]
#[command(name = "stepwise", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory (defaults to $STEPWISE_DATA_DIR or ~/.stepwise).
    #[arg(long, global = true, env = "STEPWISE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List checkpointed runs, newest first.
    #[command(alias = "ls")]
    Runs {
        /// Only show runs with this status.
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,

        /// Maximum number of runs to display.
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show a run's state and attempt history.
    Show {
        /// Run UUID.
        run_id: String,
    },

    /// Export a run's raw artifact to a file.
    Artifact {
        /// Run UUID.
        run_id: String,

        /// Destination file.
        #[arg(long, short)]
        out: PathBuf,
    },
}

/// Run status accepted by `--status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StatusFilter {
    pub fn matches(self, status: RunStatus) -> bool {
        let wanted = match self {
            StatusFilter::Pending => RunStatus::Pending,
            StatusFilter::Running => RunStatus::Running,
            StatusFilter::Completed => RunStatus::Completed,
            StatusFilter::Failed => RunStatus::Failed,
        };
        wanted == status
    }
}

// ---------------------------------------------------------------------------
// Shared formatting helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_run_id(run_id: &str) -> Result<Uuid> {
    run_id
        .parse()
        .with_context(|| format!("Invalid run ID: '{run_id}'"))
}

/// First 8 characters of a run ID, as shown in tables.
pub(crate) fn short_id(run_id: &Uuid) -> String {
    run_id.to_string().chars().take(8).collect()
}

pub(crate) fn format_run_status(status: RunStatus) -> Cell {
    match status {
        RunStatus::Pending => Cell::new("pending").fg(Color::Yellow),
        RunStatus::Running => Cell::new("running").fg(Color::Blue),
        RunStatus::Completed => Cell::new("completed").fg(Color::Green),
        RunStatus::Failed => Cell::new("failed").fg(Color::Red),
    }
}

pub(crate) fn format_attempt_status(status: AttemptStatus) -> Cell {
    match status {
        AttemptStatus::Running => Cell::new("running").fg(Color::Blue),
        AttemptStatus::Completed => Cell::new("completed").fg(Color::Green),
        AttemptStatus::Failed => Cell::new("failed").fg(Color::Red),
    }
}
