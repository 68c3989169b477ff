//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. The bucket holds
//! one second's worth of requests and refills at the same rate.

use crate::error::{Error, Result};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default outbound ceiling, in requests per second
pub const DEFAULT_REQUESTS_PER_SECOND: i32 = 10;

/// Token bucket rate limiter, shared by every call made through a client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>>,
}

impl RateLimiter {
    /// Create a limiter with capacity and refill both equal to `requests_per_second`.
    ///
    /// A ceiling of zero or less disables limiting.
    pub fn new(requests_per_second: i32) -> Self {
        let limiter = u32::try_from(requests_per_second)
            .ok()
            .and_then(NonZeroU32::new)
            .map(|rate| Arc::new(Governor::direct(Quota::per_second(rate))));

        Self { limiter }
    }

    /// A limiter that never waits
    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    /// Whether this limiter actually throttles
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until a permit is available or `cancel` fires.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            () = limiter.until_ready() => Ok(()),
        }
    }

    /// Try to take a permit without waiting
    pub fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_SECOND)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_rate_limiter_enabled() {
        assert!(RateLimiter::new(10).is_enabled());
        assert!(RateLimiter::default().is_enabled());
        assert!(!RateLimiter::new(0).is_enabled());
        assert!(!RateLimiter::new(-5).is_enabled());
        assert!(!RateLimiter::disabled().is_enabled());
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_one_second_burst() {
        let limiter = RateLimiter::new(5);

        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    const CLOCK_TOLERANCE: Duration = Duration::from_millis(5);

    #[tokio::test]
    async fn test_rate_limiter_backpressure() {
        let start = Instant::now();
        let limiter = RateLimiter::new(10);
        let cancel = CancellationToken::new();

        let mut handles = Vec::new();
        for _ in 0..15 {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move { limiter.acquire(&cancel).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // (15 - 10) / 10 s; the limiter clock may drift a few ms from Instant
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(500) - CLOCK_TOLERANCE,
            "15 permits granted after {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_disabled_limiter_never_blocks() {
        let limiter = RateLimiter::new(0);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..10_000 {
            limiter.acquire(&cancel).await.unwrap();
        }
        assert!(limiter.try_acquire());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_cancelled_wait_returns_error() {
        let limiter = RateLimiter::new(1);
        let cancel = CancellationToken::new();

        // Drain the single token
        limiter.acquire(&cancel).await.unwrap();

        let waiter = {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_fails_fast() {
        let limiter = RateLimiter::new(10);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(limiter.acquire(&cancel).await, Err(Error::Cancelled)));
    }
}
