//! Role of a user inside a family.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyRole {
    Admin,
    Member,
}

impl FamilyRole {
    pub const ALL: [FamilyRole; 2] = [FamilyRole::Admin, FamilyRole::Member];

    pub fn as_str(self) -> &'static str {
        match self {
            FamilyRole::Admin => "ADMIN",
            FamilyRole::Member => "MEMBER",
        }
    }

    pub fn is_admin(self) -> bool {
        self == FamilyRole::Admin
    }

    pub fn is_member(self) -> bool {
        self == FamilyRole::Member
    }
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(FamilyRole::Admin),
            "MEMBER" => Ok(FamilyRole::Member),
            other => Err(DomainError::InvalidRole {
                kind: "family",
                value: other.to_owned(),
                allowed: FamilyRole::ALL.map(FamilyRole::as_str).join(", "),
            }),
        }
    }
}
