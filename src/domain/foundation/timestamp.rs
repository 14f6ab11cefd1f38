//! Instants and the local wall clock.
//!
//! Audit fields (`created_at`, `joined_at`, ...) are UTC instants. Session
//! dates and times are naive local values, so "has it started" and "is the
//! leave deadline past" compare against [`local_now`].

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Shifts forward; roster tests use it to order join times.
    pub fn plus_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }

    /// Converts to wall-clock time in the local reference zone.
    ///
    /// Session dates and times are stored as naive local values, so any
    /// comparison against "now" goes through this conversion.
    pub fn to_local_naive(&self) -> NaiveDateTime {
        self.0.with_timezone(&Local).naive_local()
    }

    /// Formats as RFC 3339.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// Current wall-clock time in the local reference zone.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn plus_millis_orders_join_times() {
        let first = Timestamp::now();
        let second = first.plus_millis(5);
        assert!(first < second);
        assert_eq!(
            second.as_datetime().signed_duration_since(*first.as_datetime()),
            Duration::milliseconds(5)
        );
    }

    #[test]
    fn joined_at_serializes_as_rfc3339() {
        let dt = DateTime::parse_from_rfc3339("2025-03-07T18:05:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-03-07T18:05:00Z\"");
    }

    #[test]
    fn local_conversion_round_trips_through_local_zone() {
        let ts = Timestamp::now();
        let naive = ts.to_local_naive();
        let diff = naive - local_now();
        assert!(diff.num_seconds().abs() < 5);
    }
}
