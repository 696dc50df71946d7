//! Family use cases.

use stockroom_core::error::{StockroomError, StockroomResult};
use stockroom_core::models::family::{CreateFamily, Family, FamilyMember};
use stockroom_core::models::family_role::FamilyRole;
use stockroom_core::repository::{FamilyRepository, UserRepository};
use tracing::info;

use crate::family_guard::{FamilyAccess, FamilyGrant, FamilyGuard};
use crate::guard::{Caller, resolve_user};

pub struct FamilyService<U: UserRepository, F: FamilyRepository> {
    user_repo: U,
    family_repo: F,
}

impl<U: UserRepository, F: FamilyRepository> FamilyService<U, F> {
    pub fn new(user_repo: U, family_repo: F) -> Self {
        Self {
            user_repo,
            family_repo,
        }
    }

    /// Create a family with the caller as its first ADMIN.
    pub async fn create_family(&self, caller: &Caller, name: &str) -> StockroomResult<Family> {
        let user_id = resolve_user(&self.user_repo, caller)
            .await?
            .map_err(StockroomError::from)?;

        let family = Family::create(CreateFamily {
            id: None,
            name: name.to_owned(),
            creator_user_id: user_id,
        })?;
        let family = self.family_repo.save(family).await?;

        info!(family_id = family.id(), user_id, "Family created");
        Ok(family)
    }

    pub async fn add_member(
        &self,
        caller: &Caller,
        family_id: &str,
        user_id: i64,
        role: FamilyRole,
    ) -> StockroomResult<Family> {
        let FamilyGrant { mut family, .. } =
            self.authorize(caller, family_id, FamilyAccess::Manage).await?;

        self.user_repo.get_by_id(user_id).await?;
        family.add_member(FamilyMember::new(user_id, role))?;
        let family = self.family_repo.save(family).await?;

        info!(family_id = family.id(), user_id, role = %role, "Family member added");
        Ok(family)
    }

    /// Admins may remove anyone; any member may remove themself. The
    /// last ADMIN can never leave.
    pub async fn remove_member(
        &self,
        caller: &Caller,
        family_id: &str,
        user_id: i64,
    ) -> StockroomResult<Family> {
        let grant = self.authorize(caller, family_id, FamilyAccess::View).await?;
        if grant.user_id != user_id {
            grant.require_admin()?;
        }

        let mut family = grant.family;
        family.remove_member(user_id)?;
        let family = self.family_repo.save(family).await?;

        info!(family_id = family.id(), user_id, "Family member removed");
        Ok(family)
    }

    pub async fn update_member_role(
        &self,
        caller: &Caller,
        family_id: &str,
        user_id: i64,
        role: FamilyRole,
    ) -> StockroomResult<Family> {
        let FamilyGrant { mut family, .. } =
            self.authorize(caller, family_id, FamilyAccess::Manage).await?;

        family.update_member_role(user_id, role)?;
        let family = self.family_repo.save(family).await?;

        info!(family_id = family.id(), user_id, role = %role, "Family role changed");
        Ok(family)
    }

    pub async fn rename(
        &self,
        caller: &Caller,
        family_id: &str,
        name: &str,
    ) -> StockroomResult<Family> {
        let FamilyGrant { mut family, .. } =
            self.authorize(caller, family_id, FamilyAccess::Manage).await?;

        family.update_name(name)?;
        let family = self.family_repo.save(family).await?;

        info!(family_id = family.id(), name = family.name(), "Family renamed");
        Ok(family)
    }

    pub async fn family(&self, caller: &Caller, family_id: &str) -> StockroomResult<Family> {
        Ok(self
            .authorize(caller, family_id, FamilyAccess::View)
            .await?
            .family)
    }

    pub async fn families_for(&self, caller: &Caller) -> StockroomResult<Vec<Family>> {
        let user_id = resolve_user(&self.user_repo, caller)
            .await?
            .map_err(StockroomError::from)?;
        self.family_repo.list_for_user(user_id).await
    }

    async fn authorize(
        &self,
        caller: &Caller,
        family_id: &str,
        access: FamilyAccess,
    ) -> StockroomResult<FamilyGrant> {
        FamilyGuard::new(&self.user_repo, &self.family_repo)
            .authorize(caller, family_id, access)
            .await?
            .into_result()
    }
}
