//! Stockroom access: authorization guards for stocks and families, and
//! the use-case services that run behind them.
//!
//! Callers arrive already authenticated; see [`Caller`].

pub mod config;
pub mod family_guard;
pub mod family_service;
pub mod guard;
pub mod stock_service;

#[cfg(test)]
mod fakes;

pub use config::AccessConfig;
pub use family_guard::{FamilyAccess, FamilyGrant, FamilyGuard};
pub use family_service::FamilyService;
pub use guard::{AccessDecision, Caller, StockGrant, StockGuard, parse_identifier};
pub use stock_service::{AddItemInput, CreateStockInput, StockService, UpdateStockInput};
