//! Run record types: the durable state of one workflow execution.
//!
//! A `RunRecord` is created once per run (fresh UUIDv7, `Pending`) or
//! reconstructed from a checkpoint when resuming. The engine owns the status,
//! history, and current step; step execution owns the payload fields.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Overall status of a workflow run.
///
/// Moves forward only: `Pending -> Running -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// `Completed` and `Failed` are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Status of a single step attempt as recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Running,
    Completed,
    Failed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttemptStatus::Running => "RUNNING",
            AttemptStatus::Completed => "COMPLETED",
            AttemptStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// AttemptLog
// ---------------------------------------------------------------------------

/// Provenance entry for one step attempt transition.
///
/// Each attempt produces a `Running` entry followed by a `Completed` or
/// `Failed` entry carrying the same attempt number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptLog {
    /// Name of the step this entry belongs to.
    pub step_name: String,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// Attempt status.
    pub status: AttemptStatus,
    /// Attempt number (1-based, continues across process restarts).
    pub attempt: u32,
    /// Failure detail for `Failed` entries.
    #[serde(default)]
    pub message: Option<String>,
}

impl AttemptLog {
    /// Create an entry stamped with the current time.
    pub fn new(
        step_name: impl Into<String>,
        status: AttemptStatus,
        attempt: u32,
        message: Option<String>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            timestamp: Utc::now(),
            status,
            attempt,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// RunRecord
// ---------------------------------------------------------------------------

/// The durable, versioned state of one workflow execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// UUIDv7 assigned at creation. Never changes.
    pub run_id: Uuid,
    /// Label of the workflow definition being executed.
    pub workflow_name: String,
    /// Opaque input supplied at creation. Read-only to the engine.
    #[serde(default)]
    pub context: HashMap<String, Value>,
    /// Domain fields written by step execution.
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Reference to a binary blob held in the artifact store.
    #[serde(default)]
    pub raw_artifact_ref: Option<String>,
    /// Append-only attempt history.
    #[serde(default)]
    execution_history: Vec<AttemptLog>,
    /// Step presently executing (`None` when idle or finished).
    #[serde(default)]
    pub current_step: Option<String>,
    /// Run status.
    pub status: RunStatus,
}

impl RunRecord {
    /// Create a fresh `Pending` run with a new run ID.
    pub fn new(workflow_name: impl Into<String>, context: HashMap<String, Value>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            workflow_name: workflow_name.into(),
            context,
            payload: Map::new(),
            raw_artifact_ref: None,
            execution_history: Vec::new(),
            current_step: None,
            status: RunStatus::Pending,
        }
    }

    /// The attempt history, oldest first.
    pub fn execution_history(&self) -> &[AttemptLog] {
        &self.execution_history
    }

    /// Append an attempt entry. History is never edited or truncated.
    pub fn push_attempt(
        &mut self,
        step_name: &str,
        status: AttemptStatus,
        attempt: u32,
        message: Option<String>,
    ) {
        self.execution_history
            .push(AttemptLog::new(step_name, status, attempt, message));
    }

    /// Whether the run has reached `Completed` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The most recent history entry, if any.
    pub fn last_attempt(&self) -> Option<&AttemptLog> {
        self.execution_history.last()
    }

    /// The most recent history entry for `step_name`.
    pub fn last_attempt_for(&self, step_name: &str) -> Option<&AttemptLog> {
        self.execution_history
            .iter()
            .rev()
            .find(|log| log.step_name == step_name)
    }

    /// All history entries for `step_name`, oldest first.
    pub fn attempts_for<'a>(&'a self, step_name: &'a str) -> impl Iterator<Item = &'a AttemptLog> {
        self.execution_history
            .iter()
            .filter(move |log| log.step_name == step_name)
    }

    /// The most recent `Failed` entry across all steps.
    pub fn last_failure(&self) -> Option<&AttemptLog> {
        self.execution_history
            .iter()
            .rev()
            .find(|log| log.status == AttemptStatus::Failed)
    }

    /// Deserialize a payload field into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn payload_value<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.payload
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }

    /// Serialize `value` into the payload under `key`.
    pub fn set_payload_value<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.payload.insert(key.to_string(), value);
        Ok(())
    }

    /// Take over the step-owned fields of `other`.
    ///
    /// Only `payload` and `raw_artifact_ref` are copied; identity, status,
    /// history, and context stay with `self`.
    pub fn adopt_step_output(&mut self, other: RunRecord) {
        self.payload = other.payload;
        self.raw_artifact_ref = other.raw_artifact_ref;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
