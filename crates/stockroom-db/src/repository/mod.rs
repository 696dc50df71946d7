//! SurrealDB repository implementations.

mod family;
mod stock;
mod user;

pub use family::SurrealFamilyRepository;
pub use stock::SurrealStockRepository;
pub use user::SurrealUserRepository;

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CounterRow {
    seq: i64,
}

/// Allocate the next integer key of `sequence` (starts at 1).
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, sequence: &str) -> Result<i64, DbError> {
    let result = db
        .query("UPSERT type::record('_counter', $sequence) SET seq += 1 RETURN seq")
        .bind(("sequence", sequence.to_owned()))
        .await?;
    let mut result = result
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

    let rows: Vec<CounterRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.seq)
        .ok_or_else(|| DbError::Query(format!("sequence {sequence} returned no value")))
}
