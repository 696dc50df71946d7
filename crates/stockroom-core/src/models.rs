//! Domain models for Stockroom.
//!
//! Value objects and aggregates shared across all crates. Aggregates keep
//! their state private and only change through methods that re-check
//! their invariants.

pub mod collaborator;
pub mod family;
pub mod family_role;
pub mod permission;
pub mod quantity;
pub mod status;
pub mod stock;
pub mod stock_description;
pub mod stock_item;
pub mod stock_label;
pub mod stock_role;
pub mod summary;
pub mod user;
