//! Family aggregate root.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AdminChange, DomainError};
use crate::models::family_role::FamilyRole;

/// A user's membership in a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyMember {
    /// Membership identity, `0` until persisted.
    pub id: i64,
    pub user_id: i64,
    pub role: FamilyRole,
    pub joined_at: DateTime<Utc>,
}

impl FamilyMember {
    /// A not-yet-persisted membership joining now.
    pub fn new(user_id: i64, role: FamilyRole) -> Self {
        Self {
            id: 0,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone)]
pub struct CreateFamily {
    pub id: Option<i64>,
    pub name: String,
    pub creator_user_id: i64,
}

/// A group of users under admin/member roles.
///
/// At least one ADMIN remains at all times and a user appears at most once
/// among the members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Family {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    members: Vec<FamilyMember>,
}

impl Family {
    pub const NAME_MIN_LENGTH: usize = 3;
    pub const NAME_MAX_LENGTH: usize = 255;

    /// Create a family whose creator is its first ADMIN.
    pub fn create(input: CreateFamily) -> Result<Self, DomainError> {
        let name = validate_name(&input.name)?;
        if input.creator_user_id <= 0 {
            return Err(DomainError::InvalidCreator);
        }

        Ok(Self {
            id: input.id.unwrap_or(0),
            name,
            created_at: Utc::now(),
            members: vec![FamilyMember::new(input.creator_user_id, FamilyRole::Admin)],
        })
    }

    /// Rebuild a family from storage.
    pub fn from_parts(
        id: i64,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        members: Vec<FamilyMember>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
            members,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn add_member(&mut self, member: FamilyMember) -> Result<(), DomainError> {
        if self.is_member(member.user_id) {
            return Err(DomainError::DuplicateMember {
                user_id: member.user_id,
            });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn remove_member(&mut self, user_id: i64) -> Result<FamilyMember, DomainError> {
        let index = self
            .members
            .iter()
            .position(|m| m.user_id == user_id)
            .ok_or(DomainError::MemberNotFound { user_id })?;

        if self.members[index].is_admin() && self.admin_count() == 1 {
            return Err(DomainError::LastAdmin {
                change: AdminChange::Remove,
            });
        }

        Ok(self.members.remove(index))
    }

    pub fn update_member_role(&mut self, user_id: i64, role: FamilyRole) -> Result<(), DomainError> {
        let admins = self.admin_count();
        let member = self
            .members
            .iter_mut()
            .find(|m| m.user_id == user_id)
            .ok_or(DomainError::MemberNotFound { user_id })?;

        if member.is_admin() && !role.is_admin() && admins == 1 {
            return Err(DomainError::LastAdmin {
                change: AdminChange::Demote,
            });
        }

        member.role = role;
        Ok(())
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    pub fn get_member(&self, user_id: i64) -> Option<&FamilyMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: i64) -> bool {
        self.get_member(user_id).is_some()
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.get_member(user_id).is_some_and(FamilyMember::is_admin)
    }

    pub fn admins(&self) -> Vec<&FamilyMember> {
        self.members.iter().filter(|m| m.is_admin()).collect()
    }

    pub fn total_members(&self) -> usize {
        self.members.len()
    }

    /// Give a freshly persisted family its identity.
    pub fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn admin_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_admin()).count()
    }
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let length = name.chars().count();

    if length == 0 {
        return Err(DomainError::EmptyName);
    }
    if length < Family::NAME_MIN_LENGTH {
        return Err(DomainError::NameTooShort {
            min: Family::NAME_MIN_LENGTH,
        });
    }
    if length > Family::NAME_MAX_LENGTH {
        return Err(DomainError::NameTooLong {
            max: Family::NAME_MAX_LENGTH,
        });
    }
    Ok(name.to_owned())
}
