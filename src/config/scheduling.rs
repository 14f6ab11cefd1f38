//! Scheduling rules and venue cache settings

use chrono::Duration as ChronoDuration;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::session::ScheduleLimits;

/// Scheduling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Shortest session a host may create, in minutes
    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,

    /// Longest session a host may create, in minutes; unset means no cap
    pub max_session_minutes: Option<u32>,

    /// How many calendar months ahead a session may be scheduled
    #[serde(default = "default_booking_horizon_months")]
    pub booking_horizon_months: u32,

    /// How long venue lookups stay cached
    #[serde(default = "default_venue_cache_ttl")]
    pub venue_cache_ttl_secs: u64,

    /// Maximum number of venues held in the cache
    #[serde(default = "default_venue_cache_capacity")]
    pub venue_cache_capacity: u64,
}

impl SchedulingConfig {
    pub fn venue_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.venue_cache_ttl_secs)
    }

    /// Limits handed to the session creation handler.
    pub fn to_limits(&self) -> ScheduleLimits {
        ScheduleLimits {
            min_duration: ChronoDuration::minutes(i64::from(self.min_session_minutes)),
            max_duration: self
                .max_session_minutes
                .map(|m| ChronoDuration::minutes(i64::from(m))),
            booking_horizon_months: self.booking_horizon_months,
        }
    }

    /// Validate scheduling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_session_minutes == 0 {
            return Err(ValidationError::InvalidMinSessionLength);
        }
        if let Some(max) = self.max_session_minutes {
            if max < self.min_session_minutes {
                return Err(ValidationError::SessionLengthRange {
                    min: self.min_session_minutes,
                    max,
                });
            }
        }
        if self.booking_horizon_months == 0 || self.booking_horizon_months > 24 {
            return Err(ValidationError::InvalidBookingHorizon);
        }
        if self.venue_cache_capacity == 0 {
            return Err(ValidationError::InvalidCacheCapacity);
        }
        Ok(())
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            min_session_minutes: default_min_session_minutes(),
            max_session_minutes: None,
            booking_horizon_months: default_booking_horizon_months(),
            venue_cache_ttl_secs: default_venue_cache_ttl(),
            venue_cache_capacity: default_venue_cache_capacity(),
        }
    }
}

fn default_min_session_minutes() -> u32 {
    30
}

fn default_booking_horizon_months() -> u32 {
    3
}

fn default_venue_cache_ttl() -> u64 {
    60
}

fn default_venue_cache_capacity() -> u64 {
    1_000
}
