//! Minimum-interval rate limiter for OpenAlex requests.
//!
//! OpenAlex allows roughly 10 requests per second per client. The limiter is
//! shared by all clones of a client, so concurrent page sequences stay under
//! the budget together. It only spaces requests out; it never retries.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Default request budget for the polite pool.
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 10.0;

/// Spaces requests at least `1 / per_second` apart.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Option<Duration>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `per_second` requests. Non-positive values disable it.
    pub fn new(per_second: f64) -> Self {
        let min_interval = (per_second.is_finite() && per_second > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / per_second));
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(0.0)
    }

    pub fn is_enabled(&self) -> bool {
        self.min_interval.is_some()
    }

    /// Wait until a request is allowed, then mark it as sent.
    pub async fn acquire(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };

        // Held across the sleep so waiters queue in order.
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_SECOND)
    }
}
