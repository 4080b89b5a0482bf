//! Sliding-window rate limiting for oracle traffic.
//!
//! The window mutex guards only timestamp bookkeeping. Every sleep happens
//! with the lock released, sliced into short intervals so a keepalive ping
//! can hold the device session open during long waits.

use crate::errors::is_quota_signal;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uia_adapter::UiDriver;

const WINDOW: Duration = Duration::from_secs(60);
const KEEPALIVE_SLICE: Duration = Duration::from_secs(10);

/// Side channel pinged during long waits so the device session does not
/// idle out.
#[async_trait]
pub trait Keepalive: Send + Sync {
    async fn ping(&self);
}

/// Keepalive that does nothing. For tests and transports with no session
/// to keep warm.
#[derive(Debug, Default)]
pub struct NoopKeepalive;

#[async_trait]
impl Keepalive for NoopKeepalive {
    async fn ping(&self) {}
}

/// Keepalive backed by a cheap current-activity read on the device session.
pub struct DriverKeepalive {
    driver: Arc<dyn UiDriver>,
}

impl DriverKeepalive {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl Keepalive for DriverKeepalive {
    async fn ping(&self) {
        if let Err(error) = self.driver.current_activity().await {
            warn!(%error, "keepalive ping failed");
        }
    }
}

/// Sliding-window limiter: at most `capacity` registered calls within any
/// trailing 60 seconds.
pub struct RateLimiter {
    capacity: usize,
    max_retries: u32,
    window: Mutex<VecDeque<Instant>>,
    retry_count: Mutex<u32>,
}

impl RateLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            max_retries: 3,
            window: Mutex::new(VecDeque::new()),
            retry_count: Mutex::new(0),
        }
    }

    /// Block until a call slot is free, then claim it.
    pub async fn wait_if_needed(&self, keepalive: &dyn Keepalive) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                while window
                    .front()
                    .is_some_and(|oldest| now.duration_since(*oldest) >= WINDOW)
                {
                    window.pop_front();
                }
                if window.len() < self.capacity {
                    window.push_back(now);
                    return;
                }
                // Wait for the oldest timestamp to age out, then re-check:
                // another caller may have claimed the freed slot first.
                let oldest = window[0];
                WINDOW - now.duration_since(oldest)
            };

            info!(wait_secs = wait.as_secs(), "rate limit window full, waiting");
            sleep_with_keepalive(wait, keepalive).await;
        }
    }

    /// React to a provider error message. Returns `true` when the message is
    /// a quota signal and a backoff was applied, meaning the caller should
    /// retry; `false` means the error is someone else's problem or the retry
    /// budget is spent.
    pub async fn handle_rate_limit_error(&self, message: &str, keepalive: &dyn Keepalive) -> bool {
        if !is_quota_signal(message) {
            return false;
        }

        let retry = {
            let mut count = self.retry_count.lock().await;
            if *count >= self.max_retries {
                warn!(retries = *count, "quota backoff budget exhausted");
                return false;
            }
            *count += 1;
            *count
        };

        let backoff = Duration::from_secs(1u64 << retry);
        warn!(retry, backoff_secs = backoff.as_secs(), "quota signal, backing off");
        sleep_with_keepalive(backoff, keepalive).await;
        true
    }

    /// Clear the quota-retry counter. Called once a request succeeds.
    pub async fn reset_retries(&self) {
        *self.retry_count.lock().await = 0;
    }

    #[cfg(test)]
    async fn window_len(&self) -> usize {
        self.window.lock().await.len()
    }
}

/// Sleep for `total`, pinging the keepalive after every slice of at most
/// ten seconds.
pub async fn sleep_with_keepalive(total: Duration, keepalive: &dyn Keepalive) {
    let mut remaining = total;
    while !remaining.is_zero() {
        let slice = remaining.min(KEEPALIVE_SLICE);
        tokio::time::sleep(slice).await;
        remaining -= slice;
        debug!(remaining_secs = remaining.as_secs(), "keepalive ping during wait");
        keepalive.ping().await;
    }
}
