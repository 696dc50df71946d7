//! Stock item entity.

use serde::Serialize;

use crate::error::DomainError;
use crate::models::quantity::Quantity;

/// Minimum stock applied when none is given.
pub const DEFAULT_MINIMUM_STOCK: i64 = 1;

/// One line of a [`Stock`](crate::models::stock::Stock).
///
/// Items have no lifecycle of their own; they are created, changed and
/// removed only through their parent stock. `id` stays `0` until the item
/// is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockItem {
    id: i64,
    label: String,
    quantity: Quantity,
    description: String,
    minimum_stock: i64,
    stock_id: i64,
}

impl StockItem {
    /// Rehydrate or build an item. Fails only if `quantity` is negative;
    /// label normalization belongs to the owning stock.
    pub fn new(
        id: i64,
        label: impl Into<String>,
        quantity: i64,
        description: impl Into<String>,
        minimum_stock: i64,
        stock_id: i64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            label: label.into(),
            quantity: Quantity::new(quantity)?,
            description: description.into(),
            minimum_stock,
            stock_id,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn minimum_stock(&self) -> i64 {
        self.minimum_stock
    }

    pub fn stock_id(&self) -> i64 {
        self.stock_id
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Inclusive: `quantity == minimum_stock` is low.
    pub fn is_low_stock(&self) -> bool {
        self.quantity.is_less_or_equal_to_minimum(self.minimum_stock)
    }

    pub(crate) fn replace_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    pub(crate) fn attach_to(&mut self, stock_id: i64) {
        self.stock_id = stock_id;
    }

    pub(crate) fn has_label(&self, label: &str) -> bool {
        self.label.to_lowercase() == label.to_lowercase()
    }
}
