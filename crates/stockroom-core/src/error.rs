//! Error types for the Stockroom system.

use thiserror::Error;

use crate::models::permission::Permission;
use crate::models::stock_role::StockRole;

/// Which last-admin rule an operation tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminChange {
    Remove,
    Demote,
}

impl std::fmt::Display for AdminChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminChange::Remove => f.write_str("Cannot remove the last admin from the family"),
            AdminChange::Demote => f.write_str("Cannot demote the last admin"),
        }
    }
}

/// Broad classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input to a constructor or domain operation.
    Validation,
    /// The operation would break a uniqueness rule.
    Conflict,
    /// A referenced entity is absent from the aggregate.
    NotFound,
    /// The operation would leave the aggregate in an illegal state.
    InvariantViolation,
}

/// Failures raised synchronously by value objects and aggregates.
///
/// Every variant is raised before any state is touched, so an aggregate
/// that returned one of these is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Quantity cannot be negative (got {value})")]
    InvalidQuantity { value: i64 },

    #[error("{message}")]
    InvalidLabel { message: String },

    #[error("{message}")]
    InvalidDescription { message: String },

    #[error("Stock category cannot be empty")]
    EmptyCategory,

    #[error("Stock owner user ID must be valid")]
    InvalidOwner,

    #[error("Item label cannot be empty")]
    EmptyItemLabel,

    #[error("Item quantity cannot be negative (got {value})")]
    NegativeQuantity { value: i64 },

    #[error("An item labelled '{label}' already exists in this stock")]
    DuplicateItemLabel { label: String },

    #[error("Item {item_id} not found in this stock")]
    ItemNotFound { item_id: i64 },

    #[error("Family name cannot be empty")]
    EmptyName,

    #[error("Family name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Family name must not exceed {max} characters")]
    NameTooLong { max: usize },

    #[error("Creator user ID must be valid")]
    InvalidCreator,

    #[error("Invalid {kind} role: {value}. Must be one of: {allowed}")]
    InvalidRole {
        kind: &'static str,
        value: String,
        allowed: String,
    },

    #[error("User {user_id} is already a member of this family")]
    DuplicateMember { user_id: i64 },

    #[error("User {user_id} is not a member of this family")]
    MemberNotFound { user_id: i64 },

    #[error("{change}")]
    LastAdmin { change: AdminChange },

    #[error("The stock owner cannot be added as a collaborator")]
    OwnerAsCollaborator,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidQuantity { .. }
            | DomainError::InvalidLabel { .. }
            | DomainError::InvalidDescription { .. }
            | DomainError::EmptyCategory
            | DomainError::InvalidOwner
            | DomainError::EmptyItemLabel
            | DomainError::NegativeQuantity { .. }
            | DomainError::EmptyName
            | DomainError::NameTooShort { .. }
            | DomainError::NameTooLong { .. }
            | DomainError::InvalidCreator
            | DomainError::InvalidRole { .. }
            | DomainError::OwnerAsCollaborator => ErrorKind::Validation,
            DomainError::DuplicateItemLabel { .. } | DomainError::DuplicateMember { .. } => {
                ErrorKind::Conflict
            }
            DomainError::ItemNotFound { .. } | DomainError::MemberNotFound { .. } => {
                ErrorKind::NotFound
            }
            DomainError::LastAdmin { .. } => ErrorKind::InvariantViolation,
        }
    }
}

/// Why a guard refused a request.
///
/// Each reason stays distinct so the transport layer can pick the right
/// response code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Unauthorized - Authentication required")]
    Unauthenticated,

    #[error("Invalid identifier: {raw:?}")]
    InvalidIdentifier { raw: String },

    #[error("User not found")]
    UserNotFound,

    #[error("{resource} {id} not found")]
    ResourceNotFound { resource: &'static str, id: i64 },

    #[error("Forbidden - You do not have access to this {resource}")]
    NoAccess { resource: &'static str },

    #[error("Forbidden - Your role ({role}) does not allow {permission} access")]
    InsufficientRole { role: String, permission: String },
}

impl AccessDenied {
    pub fn insufficient(role: StockRole, permission: Permission) -> Self {
        AccessDenied::InsufficientRole {
            role: role.to_string(),
            permission: permission.to_string(),
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessDenied::Unauthenticated | AccessDenied::UserNotFound => 401,
            AccessDenied::InvalidIdentifier { .. } => 400,
            AccessDenied::ResourceNotFound { .. } => 404,
            AccessDenied::NoAccess { .. } | AccessDenied::InsufficientRole { .. } => 403,
        }
    }
}

#[derive(Debug, Error)]
pub enum StockroomError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDenied),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StockroomResult<T> = Result<T, StockroomError>;
