//! Read models handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::models::stock::Stock;
use crate::models::status::StockStatus;
use crate::models::stock_item::StockItem;

/// Flattened view of a stock with its derived totals and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    /// Summed item minimums, or `1` when that sum is not positive.
    pub minimum_stock: i64,
    pub status: StockStatus,
}

impl StockSummary {
    pub fn from_stock(stock: &Stock, unit: &str) -> Self {
        let quantity = stock.total_quantity();
        let total_minimum = stock.total_minimum_stock();
        let minimum_stock = if total_minimum > 0 { total_minimum } else { 1 };

        Self {
            id: stock.id(),
            name: stock.label().value().to_owned(),
            description: stock.description().value().to_owned(),
            category: stock.category().to_owned(),
            quantity,
            unit: unit.to_owned(),
            minimum_stock,
            status: StockStatus::derive(quantity, minimum_stock),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemView {
    pub id: i64,
    pub label: String,
    pub description: String,
    pub quantity: i64,
    pub minimum_stock: i64,
    pub stock_id: i64,
}

impl From<&StockItem> for StockItemView {
    fn from(item: &StockItem) -> Self {
        Self {
            id: item.id(),
            label: item.label().to_owned(),
            description: item.description().to_owned(),
            quantity: item.quantity().value(),
            minimum_stock: item.minimum_stock(),
            stock_id: item.stock_id(),
        }
    }
}
