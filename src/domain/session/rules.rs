//! Free-text house rules attached to a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum length for a single rule.
pub const MAX_RULE_LENGTH: usize = 500;

/// A single rule such as "Bring your own shuttlecocks".
///
/// Stored trimmed; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionRule(String);

impl SessionRule {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("rules"));
        }
        let len = trimmed.chars().count();
        if len > MAX_RULE_LENGTH {
            return Err(ValidationError::out_of_range(
                "rules",
                1,
                MAX_RULE_LENGTH as i64,
                len as i64,
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a list of raw rule strings, failing on the first invalid one.
    pub fn parse_all<I, S>(raw: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        raw.into_iter().map(Self::new).collect()
    }
}

impl TryFrom<String> for SessionRule {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionRule> for String {
    fn from(rule: SessionRule) -> Self {
        rule.0
    }
}

impl fmt::Display for SessionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
