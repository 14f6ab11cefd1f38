//! Wire formats for calendar values.
//!
//! Dates travel as `YYYY-MM-DD` and times of day as `HH:MM`, both in the
//! single local reference zone.

use chrono::{NaiveDate, NaiveTime};

use super::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::invalid_format(field, format!("expected YYYY-MM-DD, got '{}'", value))
    })
}

/// Parses an `HH:MM` time of day.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        ValidationError::invalid_format(field, format!("expected HH:MM, got '{}'", value))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
