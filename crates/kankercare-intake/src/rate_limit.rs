//! Sliding-window rate limiting for repeated form actions

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Rate limit config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_attempts: usize,
    #[serde(with = "window_secs")]
    pub window: Duration,
}

impl RateLimitConfig {
    /// 5 attempts per 15 minutes
    pub const LOGIN: Self = Self {
        max_attempts: 5,
        window: Duration::from_secs(15 * 60),
    };

    /// 3 attempts per hour
    pub const REGISTER: Self = Self {
        max_attempts: 3,
        window: Duration::from_secs(60 * 60),
    };
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::LOGIN
    }
}

mod window_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(window: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(window.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Rate limiter
///
/// Each key keeps the instants of its accepted attempts. Instances never
/// share state, so login and registration get independent windows.
#[derive(Debug)]
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn login() -> Self {
        Self::new(RateLimitConfig::LOGIN)
    }

    pub fn register() -> Self {
        Self::new(RateLimitConfig::REGISTER)
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Check if an attempt is allowed now, recording it when it is
    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    pub fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut attempts = self.attempts.lock();
        let mut retained = self.retained(attempts.get(key), now);

        if retained.len() >= self.config.max_attempts {
            tracing::warn!(key, attempts = retained.len(), "rate limit reached");
            return false;
        }

        retained.push(now);
        attempts.insert(key.to_string(), retained);
        true
    }

    /// Time until the oldest retained attempt leaves the window
    pub fn remaining_cooldown(&self, key: &str) -> Duration {
        self.remaining_cooldown_at(key, Instant::now())
    }

    pub fn remaining_cooldown_at(&self, key: &str, now: Instant) -> Duration {
        let attempts = self.attempts.lock();
        let retained = self.retained(attempts.get(key), now);

        if retained.len() < self.config.max_attempts {
            return Duration::ZERO;
        }

        match retained.iter().min() {
            Some(oldest) => self
                .config
                .window
                .saturating_sub(now.saturating_duration_since(*oldest)),
            None => Duration::ZERO,
        }
    }

    fn retained(&self, stored: Option<&Vec<Instant>>, now: Instant) -> Vec<Instant> {
        stored
            .map(|list| {
                list.iter()
                    .copied()
                    .filter(|t| now.saturating_duration_since(*t) < self.config.window)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Whole minutes shown to the user, rounded up
pub fn cooldown_minutes(remaining: Duration) -> u64 {
    remaining.as_millis().div_ceil(60_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixth_attempt_blocked_until_window_passes() {
        let limiter = RateLimiter::new(RateLimitConfig::LOGIN);
        let start = Instant::now();

        for i in 0..5 {
            assert!(limiter.is_allowed_at("k", start + Duration::from_secs(i)));
        }
        assert!(!limiter.is_allowed_at("k", start + Duration::from_secs(10)));

        let after = start + Duration::from_secs(15 * 60) + Duration::from_millis(1);
        assert!(limiter.is_allowed_at("k", after));
    }

    #[test]
    fn test_denied_attempt_not_recorded() {
        let limiter = RateLimiter::new(RateLimitConfig { max_attempts: 1, window: Duration::from_secs(60) });
        let start = Instant::now();

        assert!(limiter.is_allowed_at("k", start));
        assert!(!limiter.is_allowed_at("k", start + Duration::from_secs(30)));
        // Only the first attempt counts, so the window reopens 60s after it.
        assert!(limiter.is_allowed_at("k", start + Duration::from_secs(61)));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::register();
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.is_allowed_at("register", now));
        }
        assert!(!limiter.is_allowed_at("register", now));
        assert!(limiter.is_allowed_at("other", now));
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let login = RateLimiter::login();
        let register = RateLimiter::register();
        let now = Instant::now();

        for _ in 0..3 {
            register.is_allowed_at("k", now);
        }
        assert!(!register.is_allowed_at("k", now));
        assert!(login.is_allowed_at("k", now));
    }

    #[test]
    fn test_remaining_cooldown() {
        let limiter = RateLimiter::login();
        let start = Instant::now();

        assert_eq!(limiter.remaining_cooldown_at("k", start), Duration::ZERO);
        for _ in 0..4 {
            limiter.is_allowed_at("k", start);
        }
        assert_eq!(limiter.remaining_cooldown_at("k", start), Duration::ZERO);

        limiter.is_allowed_at("k", start);
        let later = start + Duration::from_secs(5 * 60);
        assert_eq!(limiter.remaining_cooldown_at("k", later), Duration::from_secs(10 * 60));

        let expired = start + Duration::from_secs(20 * 60);
        assert_eq!(limiter.remaining_cooldown_at("k", expired), Duration::ZERO);
    }

    #[test]
    fn test_cooldown_minutes_rounds_up() {
        assert_eq!(cooldown_minutes(Duration::ZERO), 0);
        assert_eq!(cooldown_minutes(Duration::from_secs(1)), 1);
        assert_eq!(cooldown_minutes(Duration::from_secs(600)), 10);
        assert_eq!(cooldown_minutes(Duration::from_secs(601)), 11);
    }
}
