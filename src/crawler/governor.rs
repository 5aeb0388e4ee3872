//! Randomized politeness delays
//!
//! Two profiles are used by the crawl: a coarse one between product fetches
//! and listing pages, and a fine one after every translation call.

use crate::config::RateLimitConfig;
use rand::Rng;
use std::time::Duration;

/// Sleeps for a uniformly random duration in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateGovernor {
    min: Duration,
    max: Duration,
}

impl RateGovernor {
    /// Creates a governor; an inverted range is reordered
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Profile applied between product fetches and listing pages
    pub fn coarse(config: &RateLimitConfig) -> Self {
        let (min, max) = config.product_delay();
        Self::new(min, max)
    }

    /// Profile applied after each translation call
    pub fn fine(config: &RateLimitConfig) -> Self {
        let (min, max) = config.translation_delay();
        Self::new(min, max)
    }

    /// A governor that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    /// Blocks the calling flow for the next delay
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Rate governor waiting {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
