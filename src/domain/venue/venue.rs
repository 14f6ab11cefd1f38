//! Venue view consumed by session scheduling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::OperatingRange;
use crate::domain::foundation::{ValidationError, VenueId};

/// Operational status of a venue. Only active venues accept new sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueStatus {
    Active,
    Inactive,
    Maintenance,
}

impl VenueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueStatus::Active => "active",
            VenueStatus::Inactive => "inactive",
            VenueStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VenueStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(VenueStatus::Active),
            "inactive" => Ok(VenueStatus::Inactive),
            "maintenance" => Ok(VenueStatus::Maintenance),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown venue status '{}'", other),
            )),
        }
    }
}

/// A venue as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub location: String,
    pub status: VenueStatus,
    pub operating_ranges: Vec<OperatingRange>,
}

impl Venue {
    pub fn is_active(&self) -> bool {
        self.status == VenueStatus::Active
    }
}
