//! Stock status derivation for presentation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Health of a stock, from its total quantity against its total minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Low,
    Optimal,
}

impl StockStatus {
    /// - `out-of-stock` when `quantity == 0`
    /// - `critical` when `quantity < 10% of minimum`
    /// - `low` when `quantity < 30% of minimum`
    /// - `optimal` otherwise
    ///
    /// The comparisons are strict and evaluated on integers
    /// (`10q < m`, `10q < 3m`), so boundary values land in the higher tier.
    pub fn derive(quantity: i64, minimum: i64) -> Self {
        let quantity = i128::from(quantity);
        let minimum = i128::from(minimum);

        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity * 10 < minimum {
            StockStatus::Critical
        } else if quantity * 10 < minimum * 3 {
            StockStatus::Low
        } else {
            StockStatus::Optimal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out-of-stock",
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Optimal => "optimal",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
