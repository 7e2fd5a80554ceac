//! 標準時刻実装と固定時刻実装

use crate::ports::outbound::Clock;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// システム時刻（chrono::Utc::now）を返す Clock 実装
#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す Clock 実装（テスト・再現用）
///
/// `set` で時刻を進められる。
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// RFC3339 文字列から作る。パースできなければ None
    pub fn at(rfc3339: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|t| Self::new(t.with_timezone(&Utc)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fixed_clock_at_and_set() {
        let clock = FixedClock::at("2024-05-16T12:00:00Z").unwrap();
        assert_eq!(clock.now().to_rfc3339(), "2024-05-16T12:00:00+00:00");
        clock.set(clock.now() + Duration::hours(2));
        assert_eq!(clock.now().to_rfc3339(), "2024-05-16T14:00:00+00:00");
    }

    #[test]
    fn test_fixed_clock_rejects_garbage() {
        assert!(FixedClock::at("yesterday").is_none());
    }

    #[test]
    fn test_std_clock_moves_forward() {
        let a = StdClock.now();
        let b = StdClock.now();
        assert!(b >= a);
    }
}
