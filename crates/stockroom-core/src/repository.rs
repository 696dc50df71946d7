//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Services receive repositories
//! through their constructors; nothing reaches for a shared instance.

use crate::error::StockroomResult;
use crate::models::{
    collaborator::StockCollaborator,
    family::Family,
    stock::Stock,
    stock_role::StockRole,
    user::{CreateUser, User},
};

/// Whether a stock exists and, if so, who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOwnership {
    pub exists: bool,
    pub owner_user_id: Option<i64>,
}

impl StockOwnership {
    pub const MISSING: StockOwnership = StockOwnership {
        exists: false,
        owner_user_id: None,
    };

    pub fn owned_by(user_id: i64) -> Self {
        Self {
            exists: true,
            owner_user_id: Some(user_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = StockroomResult<User>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = StockroomResult<User>> + Send;
    /// Resolve an authenticated subject to a user id.
    fn find_id_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StockroomResult<Option<i64>>> + Send;
}

// ---------------------------------------------------------------------------
// Stocks
// ---------------------------------------------------------------------------

pub trait StockRepository: Send + Sync {
    fn find_ownership(
        &self,
        stock_id: i64,
    ) -> impl Future<Output = StockroomResult<StockOwnership>> + Send;

    /// The raw role literal stored for `(stock, user)`, if any.
    fn find_collaborator_role(
        &self,
        stock_id: i64,
        user_id: i64,
    ) -> impl Future<Output = StockroomResult<Option<String>>> + Send;

    fn load_with_items(
        &self,
        stock_id: i64,
    ) -> impl Future<Output = StockroomResult<Option<Stock>>> + Send;

    /// Persist the aggregate. A stock with id `0` receives its identity
    /// here, and so does every item with id `0`. Items no longer present
    /// in the aggregate are deleted.
    fn save(&self, stock: Stock) -> impl Future<Output = StockroomResult<Stock>> + Send;

    /// Delete a stock with its items and collaborators.
    fn delete(&self, stock_id: i64) -> impl Future<Output = StockroomResult<()>> + Send;

    fn list_by_owner(
        &self,
        user_id: i64,
    ) -> impl Future<Output = StockroomResult<Vec<Stock>>> + Send;

    /// Stocks on which `user_id` holds a collaborator role.
    fn list_shared_with(
        &self,
        user_id: i64,
    ) -> impl Future<Output = StockroomResult<Vec<Stock>>> + Send;

    /// Grant or replace a collaborator role.
    fn upsert_collaborator(
        &self,
        stock_id: i64,
        user_id: i64,
        role: StockRole,
    ) -> impl Future<Output = StockroomResult<()>> + Send;

    /// Returns whether a collaborator record was removed.
    fn remove_collaborator(
        &self,
        stock_id: i64,
        user_id: i64,
    ) -> impl Future<Output = StockroomResult<bool>> + Send;

    fn list_collaborators(
        &self,
        stock_id: i64,
    ) -> impl Future<Output = StockroomResult<Vec<StockCollaborator>>> + Send;
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

pub trait FamilyRepository: Send + Sync {
    fn load(&self, family_id: i64)
    -> impl Future<Output = StockroomResult<Option<Family>>> + Send;

    /// Persist the aggregate, assigning identities to the family and to
    /// new memberships. Memberships no longer present are deleted.
    fn save(&self, family: Family) -> impl Future<Output = StockroomResult<Family>> + Send;

    fn list_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = StockroomResult<Vec<Family>>> + Send;
}
