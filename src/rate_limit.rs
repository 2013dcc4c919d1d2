//! Rate limiting module for preventing abuse
//!
//! Implements sliding window rate limiting using in-memory storage (DashMap).
//! Suitable for single-instance deployments; the relational store is never
//! consulted on the hot path.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Global rate limiter instance
pub static RATE_LIMITER: Lazy<Arc<RateLimiter>> = Lazy::new(|| Arc::new(RateLimiter::new()));

/// Error returned when a rate limit is exceeded
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after_seconds: u64,
}

impl std::fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rate limit exceeded. Retry after {} seconds.",
            self.retry_after_seconds
        )
    }
}

impl std::error::Error for RateLimitError {}

/// Sliding-window limiter keyed by an arbitrary string (ip, user id).
pub struct RateLimiter {
    windows: DashMap<String, Vec<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Record an attempt under `key` and reject it when more than `max`
    /// attempts landed within `window`.
    pub fn check(&self, key: &str, max: usize, window: Duration) -> Result<(), RateLimitError> {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_default();

        entry.retain(|t| now.duration_since(*t) < window);

        if entry.len() >= max {
            let oldest = entry.iter().min().copied().unwrap_or(now);
            let retry_after = window.saturating_sub(now.duration_since(oldest));
            return Err(RateLimitError {
                retry_after_seconds: retry_after.as_secs().max(1),
            });
        }

        entry.push(now);
        Ok(())
    }

    /// Drop windows with no recent attempts. Called periodically from the
    /// background cleanup task.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.windows
            .retain(|_, attempts| attempts.iter().any(|t| now.duration_since(*t) < max_age));
    }
}

pub fn check_login_rate_limit(ip: &str) -> Result<(), RateLimitError> {
    let config = crate::app_config::rate_limit();
    RATE_LIMITER.check(
        &format!("login:{}", ip),
        config.login_max_attempts as usize,
        Duration::from_secs(config.login_window_seconds as u64),
    )
}

pub fn check_registration_rate_limit(ip: &str) -> Result<(), RateLimitError> {
    let config = crate::app_config::rate_limit();
    RATE_LIMITER.check(
        &format!("registration:{}", ip),
        config.registration_per_hour as usize,
        Duration::from_secs(3600),
    )
}

pub fn check_generation_rate_limit(user_id: i32) -> Result<(), RateLimitError> {
    let config = crate::app_config::rate_limit();
    RATE_LIMITER.check(
        &format!("generation:{}", user_id),
        config.generation_max_runs as usize,
        Duration::from_secs(config.generation_window_seconds as u64),
    )
}

/// Periodic cleanup entry point for the background task.
pub fn cleanup_old_entries_public() {
    RATE_LIMITER.cleanup(Duration::from_secs(7200));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            limiter
                .check("k", 5, Duration::from_secs(60))
                .expect("within limit");
        }
        let err = limiter.check("k", 5, Duration::from_secs(60));
        assert!(err.is_err());
        assert!(err.unwrap_err().retry_after_seconds >= 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            limiter.check("a", 5, Duration::from_secs(60)).unwrap();
        }
        limiter
            .check("b", 5, Duration::from_secs(60))
            .expect("other key unaffected");
    }

    #[test]
    fn test_cleanup_drops_stale_windows() {
        let limiter = RateLimiter::new();
        limiter.check("stale", 5, Duration::from_secs(60)).unwrap();
        limiter.cleanup(Duration::from_secs(0));
        assert!(limiter.windows.is_empty());
    }
}
