//! Exponential backoff between step attempts.

use std::time::Duration;

use stepwise_types::policy::ResiliencePolicy;

/// Delay to wait after a failed `attempt` before the next one.
///
/// Grows as `2^(attempt - 1)` seconds and is clamped to
/// `[policy.min_wait, policy.max_wait]`.
pub fn backoff_delay(policy: &ResiliencePolicy, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let secs = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    Duration::from_secs(secs)
        .max(policy.min_wait())
        .min(policy.max_wait())
}
