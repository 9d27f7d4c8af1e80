use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::{
    ports::{PageRequest, PageResponse, PageTransport},
    Result,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fixed-count, fixed-delay retry policy for the page fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `attempts` tries with no pause in between.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            max_attempts: attempts,
            delay: Duration::ZERO,
        }
    }

    /// Pause before the attempt following failed attempt `attempt` (1-based).
    pub fn backoff(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Send `req` until it returns HTTP 200 or the policy runs out.
///
/// The last attempt's result is returned as-is: a non-200 response comes back
/// as `Ok` and the caller decides what it means.
pub async fn send_with_retry(
    transport: &dyn PageTransport,
    req: &PageRequest,
    policy: RetryPolicy,
) -> Result<PageResponse> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let result = transport.get(req).await;
        let succeeded = match &result {
            Ok(resp) if resp.is_ok() => true,
            Ok(resp) => {
                warn!(
                    attempt,
                    "Bad response to HTTP request, maybe retrying: {}",
                    resp.dump()
                );
                false
            }
            Err(e) => {
                warn!(attempt, "Error making HTTP request, maybe retrying: {e}");
                false
            }
        };

        if succeeded || attempt >= attempts {
            return result;
        }

        let pause = policy.backoff(attempt);
        if !pause.is_zero() {
            sleep(pause).await;
        }
        attempt += 1;
    }
}
