//! Parsing of raw command fields into domain values.
//!
//! Delivery layers pass identifiers, dates and times through as strings;
//! every malformed value becomes a `SessionError::Validation` naming the
//! offending field.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::foundation::{parse_date, parse_time, CourtId, ValidationError};
use crate::domain::session::{PlayerLevel, SessionError, SessionWindow};

pub(super) fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, SessionError> {
    raw.trim()
        .parse()
        .map_err(|_| SessionError::validation(field, format!("'{}' is not a valid UUID", raw)))
}

pub(super) fn parse_court_ids(raw: &[String]) -> Result<Vec<CourtId>, SessionError> {
    raw.iter().map(|id| parse_id("court_ids", id)).collect()
}

pub(super) fn parse_level(raw: &str) -> Result<PlayerLevel, SessionError> {
    Ok(raw.parse::<PlayerLevel>()?)
}

pub(super) fn parse_window(date: &str, start: &str, end: &str) -> Result<SessionWindow, SessionError> {
    let date: NaiveDate = parse_date("date", date)?;
    let start: NaiveTime = parse_time("start_time", start)?;
    let end: NaiveTime = parse_time("end_time", end)?;
    Ok(SessionWindow::new(date, start, end))
}

/// Parses an optional filter value, treating blank strings as absent.
pub(super) fn parse_optional<T>(
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, SessionError>,
) -> Result<Option<T>, SessionError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}

pub(super) fn parse_status<T>(field: &str, raw: &str) -> Result<T, SessionError>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse::<T>().map_err(|e| SessionError::validation(field, e.to_string()))
}
