//! Collaborator role on a stock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::models::permission::Permission;

/// Graded access level a user holds on one stock.
///
/// | role | read | write | suggest |
/// |---|---|---|---|
/// | `OWNER` | yes | yes | yes |
/// | `EDITOR` | yes | yes | yes |
/// | `VIEWER` | yes | no | no |
/// | `VIEWER_CONTRIBUTOR` | yes | no | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockRole {
    Owner,
    Editor,
    Viewer,
    ViewerContributor,
}

impl StockRole {
    pub const ALL: [StockRole; 4] = [
        StockRole::Owner,
        StockRole::Editor,
        StockRole::Viewer,
        StockRole::ViewerContributor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StockRole::Owner => "OWNER",
            StockRole::Editor => "EDITOR",
            StockRole::Viewer => "VIEWER",
            StockRole::ViewerContributor => "VIEWER_CONTRIBUTOR",
        }
    }

    pub fn is_owner(self) -> bool {
        self == StockRole::Owner
    }

    pub fn is_editor(self) -> bool {
        self == StockRole::Editor
    }

    pub fn is_viewer(self) -> bool {
        self == StockRole::Viewer
    }

    pub fn is_viewer_contributor(self) -> bool {
        self == StockRole::ViewerContributor
    }

    pub fn can_read(self) -> bool {
        match self {
            StockRole::Owner | StockRole::Editor | StockRole::Viewer | StockRole::ViewerContributor => {
                true
            }
        }
    }

    pub fn can_write(self) -> bool {
        match self {
            StockRole::Owner | StockRole::Editor => true,
            StockRole::Viewer | StockRole::ViewerContributor => false,
        }
    }

    pub fn can_suggest(self) -> bool {
        match self {
            StockRole::Owner | StockRole::Editor | StockRole::ViewerContributor => true,
            StockRole::Viewer => false,
        }
    }

    pub fn has_required_permission(self, permission: Permission) -> bool {
        match permission {
            Permission::Read => self.can_read(),
            Permission::Write => self.can_write(),
            Permission::Suggest => self.can_suggest(),
        }
    }

    /// Like [`has_required_permission`](Self::has_required_permission) but
    /// for a raw token. Unknown tokens are never permitted.
    pub fn permits_token(self, token: &str) -> bool {
        token
            .parse::<Permission>()
            .is_ok_and(|permission| self.has_required_permission(permission))
    }
}

impl fmt::Display for StockRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StockRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidRole {
                kind: "stock",
                value: s.to_owned(),
                allowed: StockRole::ALL.map(StockRole::as_str).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_table_is_exact() {
        use Permission::{Read, Suggest, Write};
        use StockRole::{Editor, Owner, Viewer, ViewerContributor};

        let expected = [
            (Owner, Read, true),
            (Owner, Write, true),
            (Owner, Suggest, true),
            (Editor, Read, true),
            (Editor, Write, true),
            (Editor, Suggest, true),
            (Viewer, Read, true),
            (Viewer, Write, false),
            (Viewer, Suggest, false),
            (ViewerContributor, Read, true),
            (ViewerContributor, Write, false),
            (ViewerContributor, Suggest, true),
        ];

        for (role, permission, allowed) in expected {
            assert_eq!(
                role.has_required_permission(permission),
                allowed,
                "{role} / {permission}"
            );
        }
    }

    #[test]
    fn parses_only_the_four_literals() {
        for role in StockRole::ALL {
            assert_eq!(role.as_str().parse::<StockRole>(), Ok(role));
        }
        let err = "owner".parse::<StockRole>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid stock role: owner. Must be one of: OWNER, EDITOR, VIEWER, VIEWER_CONTRIBUTOR"
        );
        assert!("ADMIN".parse::<StockRole>().is_err());
    }

    #[test]
    fn unknown_permission_token_fails_closed() {
        for role in StockRole::ALL {
            assert!(!role.permits_token("delete"));
            assert!(!role.permits_token(""));
            assert!(role.permits_token("read"));
        }
        assert!(StockRole::Editor.permits_token("write"));
        assert!(!StockRole::Viewer.permits_token("write"));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!("EDITOR".parse::<StockRole>().unwrap(), StockRole::Editor);
        assert_ne!(StockRole::Viewer, StockRole::ViewerContributor);
    }

    #[test]
    fn serde_uses_literals() {
        let json = serde_json::to_string(&StockRole::ViewerContributor).unwrap();
        assert_eq!(json, "\"VIEWER_CONTRIBUTOR\"");
    }
}
