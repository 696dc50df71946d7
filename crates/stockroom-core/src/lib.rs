//! Stockroom core: domain model, error taxonomy and repository traits.
//!
//! Stocks own items with quantities and minimum thresholds; collaborators
//! hold graded roles on individual stocks; families group users under
//! admin/member roles. Nothing in this crate performs I/O.

pub mod error;
pub mod models;
pub mod repository;
