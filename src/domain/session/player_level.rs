//! Skill level a session is aimed at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl PlayerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerLevel::Beginner => "beginner",
            PlayerLevel::Intermediate => "intermediate",
            PlayerLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for PlayerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayerLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(PlayerLevel::Beginner),
            "intermediate" => Ok(PlayerLevel::Intermediate),
            "advanced" => Ok(PlayerLevel::Advanced),
            _ => Err(ValidationError::invalid_format(
                "player_level",
                "must be one of beginner, intermediate, advanced",
            )),
        }
    }
}
