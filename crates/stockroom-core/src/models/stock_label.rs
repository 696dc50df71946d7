//! Stock label value object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Trimmed stock label, between 3 and 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockLabel(String);

impl StockLabel {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 50;

    pub fn new(label: &str) -> Result<Self, DomainError> {
        let normalized = label.trim();
        let length = normalized.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(DomainError::InvalidLabel {
                message: format!(
                    "Stock label must be at least {} characters.",
                    Self::MIN_LENGTH
                ),
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(DomainError::InvalidLabel {
                message: format!(
                    "Stock label must not exceed {} characters.",
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

impl TryFrom<String> for StockLabel {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StockLabel::new(&value)
    }
}

impl TryFrom<&str> for StockLabel {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        StockLabel::new(value)
    }
}

impl From<StockLabel> for String {
    fn from(label: StockLabel) -> Self {
        label.0
    }
}

impl fmt::Display for StockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
