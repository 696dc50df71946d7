//! Stock description value object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Trimmed, non-empty stock description of at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockDescription(String);

impl StockDescription {
    pub const MAX_LENGTH: usize = 200;

    pub fn new(description: &str) -> Result<Self, DomainError> {
        let normalized = description.trim();

        if normalized.is_empty() {
            return Err(DomainError::InvalidDescription {
                message: "Stock description cannot be empty.".into(),
            });
        }
        if normalized.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidDescription {
                message: format!(
                    "Stock description must not exceed {} characters.",
                    Self::MAX_LENGTH
                ),
            });
        }

        Ok(Self(normalized.to_owned()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StockDescription {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StockDescription::new(&value)
    }
}

impl TryFrom<&str> for StockDescription {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        StockDescription::new(value)
    }
}

impl From<StockDescription> for String {
    fn from(description: StockDescription) -> Self {
        description.0
    }
}

impl fmt::Display for StockDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
