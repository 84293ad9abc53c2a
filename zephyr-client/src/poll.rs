//! Bounded await-predicate primitive.
//!
//! External conditions (confirmation finality, a provider appearing) are
//! awaited through this instead of ad-hoc timer loops, so every wait has an
//! explicit attempt bound and interval.

use std::future::Future;
use std::time::Duration;

use crate::{ClientError, Result};

/// Attempt bound and spacing for a poll loop.
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    /// Maximum number of probe attempts before giving up.
    pub max_attempts: u32,
    /// Sleep between attempts.
    pub interval: Duration,
}

impl PollConfig {
    /// Create a poll configuration.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

/// Await a predicate until it produces a value or the attempt bound runs out.
///
/// The probe returns `Ok(Some(value))` when the condition holds,
/// `Ok(None)` to keep waiting, or `Err` to abort immediately. Exhausting
/// the bound maps to `NetworkFailure`.
pub async fn poll_until<T, F, Fut>(config: &PollConfig, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    for attempt in 1..=config.max_attempts {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }
    Err(ClientError::NetworkFailure(format!(
        "condition not met after {} attempts",
        config.max_attempts
    )))
}
