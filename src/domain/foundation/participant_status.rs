//! ParticipantStatus enum for a user's seat in a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Status of a participant row.
///
/// A pending participant waits for a confirmed seat to free up. Cancelled
/// rows are kept for history and never reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl ParticipantStatus {
    /// Stable lowercase name used for storage and the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Confirmed => "confirmed",
            ParticipantStatus::Pending => "pending",
            ParticipantStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ParticipantStatus::Cancelled)
    }
}

impl StateMachine for ParticipantStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use ParticipantStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Cancelled],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(ParticipantStatus::Confirmed),
            "pending" => Ok(ParticipantStatus::Pending),
            "cancelled" => Ok(ParticipantStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown participant status '{}'", other),
            )),
        }
    }
}
