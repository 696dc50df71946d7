//! Family authorization guard.
//!
//! Same order as the stock guard: caller, identifier, user, family, then
//! membership. Members may view; only an ADMIN may manage.

use std::fmt;

use stockroom_core::error::{AccessDenied, StockroomResult};
use stockroom_core::models::family::Family;
use stockroom_core::models::family_role::FamilyRole;
use stockroom_core::repository::{FamilyRepository, UserRepository};
use tracing::{debug, info};

use crate::guard::{AccessDecision, Caller, parse_identifier, resolve_user};

/// What the caller wants to do with a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyAccess {
    View,
    /// Add or remove members, change roles, rename.
    Manage,
}

impl FamilyAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            FamilyAccess::View => "view",
            FamilyAccess::Manage => "manage",
        }
    }
}

impl fmt::Display for FamilyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An allowed caller together with the family it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyGrant {
    pub user_id: i64,
    pub role: FamilyRole,
    pub family: Family,
}

impl FamilyGrant {
    /// Refuse unless the caller is an ADMIN of the family.
    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(insufficient(self.role, FamilyAccess::Manage))
        }
    }
}

fn insufficient(role: FamilyRole, access: FamilyAccess) -> AccessDenied {
    AccessDenied::InsufficientRole {
        role: role.to_string(),
        permission: access.to_string(),
    }
}

pub struct FamilyGuard<'r, U: UserRepository, F: FamilyRepository> {
    users: &'r U,
    families: &'r F,
}

impl<'r, U: UserRepository, F: FamilyRepository> FamilyGuard<'r, U, F> {
    pub fn new(users: &'r U, families: &'r F) -> Self {
        Self { users, families }
    }

    pub async fn authorize(
        &self,
        caller: &Caller,
        raw_family_id: &str,
        access: FamilyAccess,
    ) -> StockroomResult<AccessDecision<FamilyGrant>> {
        let decision = self.decide(caller, raw_family_id, access).await?;
        match &decision {
            AccessDecision::Allowed(grant) => debug!(
                family_id = grant.family.id(),
                user_id = grant.user_id,
                role = %grant.role,
                access = %access,
                "Family access granted"
            ),
            AccessDecision::Denied(reason) => info!(
                family_id = raw_family_id,
                access = %access,
                reason = %reason,
                "Family access denied"
            ),
        }
        Ok(decision)
    }

    async fn decide(
        &self,
        caller: &Caller,
        raw_family_id: &str,
        access: FamilyAccess,
    ) -> StockroomResult<AccessDecision<FamilyGrant>> {
        if caller.subject().is_none() {
            return Ok(AccessDecision::Denied(AccessDenied::Unauthenticated));
        }

        let Some(family_id) = parse_identifier(raw_family_id) else {
            return Ok(AccessDecision::Denied(AccessDenied::InvalidIdentifier {
                raw: raw_family_id.to_owned(),
            }));
        };

        let user_id = match resolve_user(self.users, caller).await? {
            Ok(user_id) => user_id,
            Err(reason) => return Ok(AccessDecision::Denied(reason)),
        };

        let Some(family) = self.families.load(family_id).await? else {
            return Ok(AccessDecision::Denied(AccessDenied::ResourceNotFound {
                resource: "family",
                id: family_id,
            }));
        };

        let Some(role) = family.get_member(user_id).map(|m| m.role) else {
            return Ok(AccessDecision::Denied(AccessDenied::NoAccess {
                resource: "family",
            }));
        };

        let grant = FamilyGrant {
            user_id,
            role,
            family,
        };
        match access {
            FamilyAccess::View => Ok(AccessDecision::Allowed(grant)),
            FamilyAccess::Manage => match grant.require_admin() {
                Ok(()) => Ok(AccessDecision::Allowed(grant)),
                Err(reason) => Ok(AccessDecision::Denied(reason)),
            },
        }
    }
}
