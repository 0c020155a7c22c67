//! Wall clock
//!
//! Token expiry and ban checks read the time through [`Clock`] so tests can
//! pin or advance it.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current Unix timestamp in seconds.
    fn now_unix(&self) -> i64 {
        self.now().timestamp()
    }
}

/// OS wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock pinned at the given Unix timestamp (seconds).
    pub fn at_unix(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        let now = SystemClock.now_unix();
        // 2024-01-01T00:00:00Z
        assert!(now > 1_704_067_200);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::at_unix(1_000);
        assert_eq!(clock.now_unix(), 1_000);

        clock.advance(Duration::minutes(15));
        assert_eq!(clock.now_unix(), 1_900);

        clock.set(DateTime::from_timestamp(42, 0).unwrap());
        assert_eq!(clock.now_unix(), 42);
    }
}
