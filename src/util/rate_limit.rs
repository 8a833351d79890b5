//! Sliding-window request limiter
//!
//! Tracks request timestamps in a window and refuses requests once the cap
//! is reached. Timestamps older than the window are pruned on every check.

use std::collections::VecDeque;

use tokio::time::{Duration, Instant};

/// Sliding-window rate limiter
pub struct SlidingWindowLimiter {
    timestamps: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    /// Record a request if under the cap; returns false when rate-limited
    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        while let Some(front) = self.timestamps.front() {
            if now.duration_since(*front) >= self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() >= self.max_requests {
            return false;
        }
        self.timestamps.push_back(now);
        true
    }

    /// Requests left in the current window
    pub fn remaining(&self) -> usize {
        self.max_requests.saturating_sub(self.timestamps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_allows_up_to_cap() {
        let mut limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let mut limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        // First timestamp ages out; one slot frees up.
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
