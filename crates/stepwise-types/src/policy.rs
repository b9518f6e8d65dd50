//! Per-step resilience policy: retry count and backoff bounds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retry configuration owned by the entity behind a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResiliencePolicy {
    /// Maximum number of attempts across all sessions (default 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Lower bound of the backoff between attempts, in milliseconds.
    #[serde(default = "default_min_wait_ms")]
    pub min_wait_ms: u64,
    /// Upper bound of the backoff between attempts, in milliseconds.
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_min_wait_ms() -> u64 {
    2_000
}

fn default_max_wait_ms() -> u64 {
    10_000
}

impl Default for ResiliencePolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            min_wait_ms: default_min_wait_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl ResiliencePolicy {
    /// Build a validated policy.
    pub fn new(max_retries: u32, min_wait: Duration, max_wait: Duration) -> Result<Self, PolicyError> {
        let policy = Self {
            max_retries,
            min_wait_ms: min_wait.as_millis() as u64,
            max_wait_ms: max_wait.as_millis() as u64,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// A policy that retries immediately, without waiting.
    pub fn no_wait(max_retries: u32) -> Self {
        Self {
            max_retries,
            min_wait_ms: 0,
            max_wait_ms: 0,
        }
    }

    /// Check `max_retries >= 1` and `min_wait <= max_wait`.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_retries == 0 {
            return Err(PolicyError::ZeroRetries);
        }
        if self.min_wait_ms > self.max_wait_ms {
            return Err(PolicyError::InvertedBounds {
                min_ms: self.min_wait_ms,
                max_ms: self.max_wait_ms,
            });
        }
        Ok(())
    }

    pub fn min_wait(&self) -> Duration {
        Duration::from_millis(self.min_wait_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

/// Invalid resilience policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("max_retries must be at least 1")]
    ZeroRetries,

    #[error("min_wait ({min_ms}ms) exceeds max_wait ({max_ms}ms)")]
    InvertedBounds { min_ms: u64, max_ms: u64 },
}
