//! Session time windows and the rules that bound them.
//!
//! Everything here is pure: callers pass "now" in explicitly. Dates and times
//! are naive values in the local reference zone, combined into full
//! `NaiveDateTime` instants before any comparison.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::domain::foundation::format_time;
use crate::domain::venue::OperatingRange;

/// Date plus start/end time of day for a session.
///
/// Construction does not validate; use [`validate_window`] or
/// [`validate_against_ranges`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionWindow {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl SessionWindow {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The instant the session starts.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// The instant the session ends.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    pub fn duration(&self) -> Duration {
        self.ends_at() - self.starts_at()
    }

    /// Half-open overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &SessionWindow) -> bool {
        self.starts_at() < other.ends_at() && other.starts_at() < self.ends_at()
    }
}

/// Tunable limits applied on top of the fixed window rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleLimits {
    pub min_duration: Duration,
    pub max_duration: Option<Duration>,
    pub booking_horizon_months: u32,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            min_duration: Duration::minutes(30),
            max_duration: None,
            booking_horizon_months: 3,
        }
    }
}

/// Why a window was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("Session date {date} is in the past (today is {today})")]
    TooSoon { date: NaiveDate, today: NaiveDate },

    #[error("Session date {date} is too far ahead (latest allowed is {latest})")]
    TooFarAhead { date: NaiveDate, latest: NaiveDate },

    #[error("Start time {} must be before end time {}", hhmm(.start), hhmm(.end))]
    InvertedRange { start: NaiveTime, end: NaiveTime },

    #[error("Session must last at least {min_minutes} minutes, got {minutes}")]
    TooShort { minutes: i64, min_minutes: i64 },

    #[error("Session may last at most {max_minutes} minutes, got {minutes}")]
    TooLong { minutes: i64, max_minutes: i64 },

    #[error("Session must fall within venue hours ({})", describe_hours(.hours))]
    OutsideVenueHours { hours: Option<(NaiveTime, NaiveTime)> },
}

fn hhmm(time: &NaiveTime) -> String {
    format_time(*time)
}

fn describe_hours(hours: &Option<(NaiveTime, NaiveTime)>) -> String {
    match hours {
        Some((open, close)) => format!("{}-{}", format_time(*open), format_time(*close)),
        None => "venue closed that day".to_string(),
    }
}

impl WindowError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            WindowError::TooSoon { .. } => "too_soon",
            WindowError::TooFarAhead { .. } => "too_far_ahead",
            WindowError::InvertedRange { .. } => "inverted_range",
            WindowError::TooShort { .. } => "too_short",
            WindowError::TooLong { .. } => "too_long",
            WindowError::OutsideVenueHours { .. } => "outside_venue_hours",
        }
    }
}

/// Validates a window against fixed venue hours.
///
/// Rules run in order and the first failure wins:
/// date not before today, date within the booking horizon, start before end,
/// duration within limits, and the window inside `[venue_open, venue_close]`.
pub fn validate_window(
    window: &SessionWindow,
    venue_open: NaiveTime,
    venue_close: NaiveTime,
    now: NaiveDateTime,
    limits: &ScheduleLimits,
) -> Result<(), WindowError> {
    validate_timing(window, now, limits)?;

    if window.start < venue_open || window.end > venue_close {
        return Err(WindowError::OutsideVenueHours {
            hours: Some((venue_open, venue_close)),
        });
    }
    Ok(())
}

/// Validates a window against a venue's operating ranges.
///
/// Ranges for the exact session date take precedence over weekday ranges.
/// The window must fit inside at least one covering range that is open and
/// well formed.
pub fn validate_against_ranges(
    window: &SessionWindow,
    ranges: &[OperatingRange],
    now: NaiveDateTime,
    limits: &ScheduleLimits,
) -> Result<(), WindowError> {
    validate_timing(window, now, limits)?;

    let covering = covering_ranges(ranges, window.date);
    if covering
        .iter()
        .any(|range| range.contains(window.start, window.end))
    {
        return Ok(());
    }

    let hours = covering
        .iter()
        .find(|range| range.admits_sessions())
        .map(|range| (range.open_time, range.close_time));
    Err(WindowError::OutsideVenueHours { hours })
}

/// Ranges that apply on `date`, date-specific entries first.
fn covering_ranges(ranges: &[OperatingRange], date: NaiveDate) -> Vec<&OperatingRange> {
    let specific: Vec<&OperatingRange> = ranges
        .iter()
        .filter(|r| r.day.is_specific_date() && r.day.covers(date))
        .collect();
    if !specific.is_empty() {
        return specific;
    }

    ranges
        .iter()
        .filter(|r| !r.day.is_specific_date() && r.day.covers(date))
        .collect()
}

/// Rules that do not depend on the venue.
fn validate_timing(
    window: &SessionWindow,
    now: NaiveDateTime,
    limits: &ScheduleLimits,
) -> Result<(), WindowError> {
    let today = now.date();
    if window.date < today {
        return Err(WindowError::TooSoon {
            date: window.date,
            today,
        });
    }

    let latest = today
        .checked_add_months(Months::new(limits.booking_horizon_months))
        .unwrap_or(NaiveDate::MAX);
    if window.date > latest {
        return Err(WindowError::TooFarAhead {
            date: window.date,
            latest,
        });
    }

    if window.start >= window.end {
        return Err(WindowError::InvertedRange {
            start: window.start,
            end: window.end,
        });
    }

    let minutes = window.duration().num_minutes();
    if window.duration() < limits.min_duration {
        return Err(WindowError::TooShort {
            minutes,
            min_minutes: limits.min_duration.num_minutes(),
        });
    }

    if let Some(max) = limits.max_duration {
        if window.duration() > max {
            return Err(WindowError::TooLong {
                minutes,
                max_minutes: max.num_minutes(),
            });
        }
    }

    Ok(())
}
