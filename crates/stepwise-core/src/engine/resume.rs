//! Resume-point detection and attempt numbering across process restarts.
//!
//! Both functions are pure: they look only at the step names of the current
//! workflow definition and the run's attempt history.

use stepwise_types::run::{AttemptStatus, RunRecord};

/// Where execution continues for a (possibly reloaded) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumePoint {
    /// No history: start at the first step.
    Start,
    /// The last logged step completed: continue with the step after it.
    After { index: usize, step_name: String },
    /// The last logged step failed or crashed mid-attempt: run it again.
    Retry {
        index: usize,
        step_name: String,
        last_status: AttemptStatus,
    },
    /// The last logged step is not part of the current step list. Execution
    /// restarts at the first step.
    Mismatch { step_name: String },
}

impl ResumePoint {
    /// Index of the first step to execute.
    pub fn start_index(&self) -> usize {
        match self {
            ResumePoint::Start | ResumePoint::Mismatch { .. } => 0,
            ResumePoint::After { index, .. } => index + 1,
            ResumePoint::Retry { index, .. } => *index,
        }
    }
}

/// Determine where to resume `record` against the given step names.
///
/// Matches the last history entry by exact step name. The first step with
/// that name wins if a list repeats a name.
pub fn resume_point<S: AsRef<str>>(step_names: &[S], record: &RunRecord) -> ResumePoint {
    let Some(last) = record.last_attempt() else {
        return ResumePoint::Start;
    };

    let Some(index) = step_names
        .iter()
        .position(|name| name.as_ref() == last.step_name)
    else {
        return ResumePoint::Mismatch {
            step_name: last.step_name.clone(),
        };
    };

    match last.status {
        AttemptStatus::Completed => ResumePoint::After {
            index,
            step_name: last.step_name.clone(),
        },
        status @ (AttemptStatus::Failed | AttemptStatus::Running) => ResumePoint::Retry {
            index,
            step_name: last.step_name.clone(),
            last_status: status,
        },
    }
}

/// First attempt number to use for `step_name` in this session.
///
/// 1 when the step has no history or last completed; otherwise one past the
/// last recorded attempt, so numbering continues across restarts.
pub fn next_base_attempt(record: &RunRecord, step_name: &str) -> u32 {
    match record.last_attempt_for(step_name) {
        None => 1,
        Some(log) if log.status == AttemptStatus::Completed => 1,
        Some(log) => log.attempt + 1,
    }
}
