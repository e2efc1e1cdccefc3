use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use crate::config::RateLimitConfig;

/// Sliding-window request limiter shared across tool invocations.
///
/// The check-and-record step holds the lock for the whole read-modify-write,
/// so concurrent invocations can never both be admitted past the threshold.
/// No await happens while the lock is held.
pub struct RateLimiter {
    config: RateLimitConfig,
    hits: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: Mutex::new(VecDeque::new()),
        }
    }

    /// Admit one request, pruning entries older than the window first.
    /// Returns false when the window is full.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut hits = match self.hits.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        while let Some(front) = hits.front() {
            if now.duration_since(*front) >= self.config.window {
                hits.pop_front();
            } else {
                break;
            }
        }
        if hits.len() >= self.config.max_requests {
            return false;
        }
        hits.push_back(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn admits_up_to_threshold_then_rejects() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 3,
            window: Duration::from_secs(60),
        });
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(20),
        });
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire());
    }
}
