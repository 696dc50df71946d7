//! Stockroom persistence on SurrealDB.
//!
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Versioned schema migrations ([`run_migrations`])
//! - Implementations of the `stockroom-core` repository traits
//!   ([`SurrealUserRepository`], [`SurrealStockRepository`],
//!   [`SurrealFamilyRepository`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::{SurrealFamilyRepository, SurrealStockRepository, SurrealUserRepository};
pub use schema::{run_migrations, schema_v1};
