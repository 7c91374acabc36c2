use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ServiceError;

/// Bounded exponential backoff for external calls.
///
/// The default makes a single attempt; retrying changes observable timing,
/// so callers opt in through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .max(1.0)
            .powi(retry.saturating_sub(1) as i32);
        Duration::from_millis((self.initial_backoff_ms as f64 * factor) as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
        }
    }
}

/// Runs `call` until it succeeds or the policy's attempts are used up.
pub fn retry_service_call<T>(
    policy: &RetryPolicy,
    label: &str,
    call: impl FnMut() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    retry_with_sleep(policy, label, call, thread::sleep)
}

fn retry_with_sleep<T>(
    policy: &RetryPolicy,
    label: &str,
    mut call: impl FnMut() -> Result<T, ServiceError>,
    mut sleep: impl FnMut(Duration),
) -> Result<T, ServiceError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                let delay = policy.backoff(attempt);
                log::warn!(
                    "{label} failed (attempt {attempt}/{attempts}): {e}; retrying in {}ms",
                    delay.as_millis()
                );
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
