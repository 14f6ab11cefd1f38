//! Operating ranges decoded from a venue's opening-hours blob.
//!
//! Each entry covers either a weekday (`"monday"`) or one specific date
//! (`"2025-12-24"`). Entries are decoded once at the directory boundary so
//! the rest of the crate never sees raw strings.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    format_date, format_time, parse_date, parse_time, ValidationError,
};

/// The day an operating range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingDay {
    Weekday(Weekday),
    Date(NaiveDate),
}

impl OperatingDay {
    /// Returns true if this entry applies to `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        match self {
            OperatingDay::Weekday(day) => date.weekday() == *day,
            OperatingDay::Date(d) => *d == date,
        }
    }

    pub fn is_specific_date(&self) -> bool {
        matches!(self, OperatingDay::Date(_))
    }
}

impl fmt::Display for OperatingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingDay::Weekday(day) => {
                let name = match day {
                    Weekday::Mon => "monday",
                    Weekday::Tue => "tuesday",
                    Weekday::Wed => "wednesday",
                    Weekday::Thu => "thursday",
                    Weekday::Fri => "friday",
                    Weekday::Sat => "saturday",
                    Weekday::Sun => "sunday",
                };
                write!(f, "{}", name)
            }
            OperatingDay::Date(date) => write!(f, "{}", format_date(*date)),
        }
    }
}

impl FromStr for OperatingDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let weekday = match lowered.as_str() {
            "monday" => Some(Weekday::Mon),
            "tuesday" => Some(Weekday::Tue),
            "wednesday" => Some(Weekday::Wed),
            "thursday" => Some(Weekday::Thu),
            "friday" => Some(Weekday::Fri),
            "saturday" => Some(Weekday::Sat),
            "sunday" => Some(Weekday::Sun),
            _ => None,
        };

        match weekday {
            Some(day) => Ok(OperatingDay::Weekday(day)),
            None => parse_date("day", &lowered).map(OperatingDay::Date),
        }
    }
}

/// One opening-hours entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOperatingRange", into = "RawOperatingRange")]
pub struct OperatingRange {
    pub day: OperatingDay,
    pub is_open: bool,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

impl OperatingRange {
    pub fn new(day: OperatingDay, is_open: bool, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            day,
            is_open,
            open_time,
            close_time,
        }
    }

    /// Returns true if this entry can admit any session at all.
    ///
    /// Closed days and entries whose close time is not after the open time
    /// admit nothing.
    pub fn admits_sessions(&self) -> bool {
        self.is_open && self.open_time < self.close_time
    }

    /// Returns true if `[start, end]` lies within this range.
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.admits_sessions() && start >= self.open_time && end <= self.close_time
    }
}

/// Wire shape: `{"day": "monday", "is_open": true, "open_time": "08:00", "close_time": "22:00"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOperatingRange {
    day: String,
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    open_time: String,
    #[serde(default)]
    close_time: String,
}

impl TryFrom<RawOperatingRange> for OperatingRange {
    type Error = ValidationError;

    fn try_from(raw: RawOperatingRange) -> Result<Self, Self::Error> {
        let day = raw.day.parse()?;

        // Closed days often omit their hours entirely.
        if !raw.is_open && raw.open_time.is_empty() && raw.close_time.is_empty() {
            return Ok(Self::new(day, false, NaiveTime::MIN, NaiveTime::MIN));
        }

        Ok(Self::new(
            day,
            raw.is_open,
            parse_time("open_time", &raw.open_time)?,
            parse_time("close_time", &raw.close_time)?,
        ))
    }
}

impl From<OperatingRange> for RawOperatingRange {
    fn from(range: OperatingRange) -> Self {
        Self {
            day: range.day.to_string(),
            is_open: range.is_open,
            open_time: format_time(range.open_time),
            close_time: format_time(range.close_time),
        }
    }
}
