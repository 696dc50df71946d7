//! Stock aggregate root.

use serde::Serialize;

use crate::error::DomainError;
use crate::models::quantity::Quantity;
use crate::models::stock_description::StockDescription;
use crate::models::stock_item::{DEFAULT_MINIMUM_STOCK, StockItem};
use crate::models::stock_label::StockLabel;

/// Fields required to create a new stock.
#[derive(Debug, Clone)]
pub struct CreateStock {
    /// Known identity, or `None` for a stock that has not been persisted.
    pub id: Option<i64>,
    pub label: String,
    pub description: String,
    pub category: String,
    /// The owning user.
    pub user_id: i64,
}

/// Fields for a new item added to a stock.
#[derive(Debug, Clone, Default)]
pub struct NewStockItem {
    pub label: String,
    pub description: Option<String>,
    pub quantity: i64,
    /// Defaults to [`DEFAULT_MINIMUM_STOCK`].
    pub minimum_stock: Option<i64>,
}

/// A container of items owned by one user.
///
/// Invariants held by every method:
/// - item labels are unique within the stock, ignoring case;
/// - no item carries a negative quantity;
/// - totals are computed from the items, never stored.
///
/// Items keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stock {
    id: i64,
    label: StockLabel,
    description: StockDescription,
    category: String,
    user_id: i64,
    items: Vec<StockItem>,
}

impl Stock {
    pub fn create(input: CreateStock) -> Result<Self, DomainError> {
        let label = StockLabel::new(&input.label)?;
        let description = StockDescription::new(&input.description)?;
        let category = validate_category(&input.category)?;

        if input.user_id <= 0 {
            return Err(DomainError::InvalidOwner);
        }

        Ok(Self {
            id: input.id.unwrap_or(0),
            label,
            description,
            category,
            user_id: input.user_id,
            items: Vec::new(),
        })
    }

    /// Rebuild a stock from already-validated parts (used by repositories).
    pub fn from_parts(
        id: i64,
        label: StockLabel,
        description: StockDescription,
        category: impl Into<String>,
        user_id: i64,
        items: Vec<StockItem>,
    ) -> Self {
        Self {
            id,
            label,
            description,
            category: category.into(),
            user_id,
            items,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &StockLabel {
        &self.label
    }

    pub fn description(&self) -> &StockDescription {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn item(&self, item_id: i64) -> Option<&StockItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Append a new item (identity `0` until persisted).
    pub fn add_item(&mut self, input: NewStockItem) -> Result<&StockItem, DomainError> {
        let label = input.label.trim();
        if label.is_empty() {
            return Err(DomainError::EmptyItemLabel);
        }
        if input.quantity < 0 {
            return Err(DomainError::NegativeQuantity {
                value: input.quantity,
            });
        }
        if self.items.iter().any(|item| item.has_label(label)) {
            return Err(DomainError::DuplicateItemLabel {
                label: label.to_owned(),
            });
        }

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let item = StockItem::new(
            0,
            label,
            input.quantity,
            description,
            input.minimum_stock.unwrap_or(DEFAULT_MINIMUM_STOCK),
            self.id,
        )?;

        self.items.push(item);
        Ok(self.items.last().unwrap_or_else(|| unreachable!("item was just pushed")))
    }

    pub fn update_item_quantity(&mut self, item_id: i64, new_quantity: i64) -> Result<(), DomainError> {
        if new_quantity < 0 {
            return Err(DomainError::NegativeQuantity {
                value: new_quantity,
            });
        }
        self.set_item_quantity(item_id, Quantity::new(new_quantity)?)
    }

    pub fn set_item_quantity(&mut self, item_id: i64, quantity: Quantity) -> Result<(), DomainError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or(DomainError::ItemNotFound { item_id })?;
        item.replace_quantity(quantity);
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: i64) -> Result<StockItem, DomainError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or(DomainError::ItemNotFound { item_id })?;
        Ok(self.items.remove(index))
    }

    /// Replace label and description. Both are validated before either is
    /// applied.
    pub fn update_info(&mut self, label: &str, description: &str) -> Result<(), DomainError> {
        let label = StockLabel::new(label)?;
        let description = StockDescription::new(description)?;
        self.label = label;
        self.description = description;
        Ok(())
    }

    pub fn update_category(&mut self, category: &str) -> Result<(), DomainError> {
        self.category = validate_category(category)?;
        Ok(())
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Saturates at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.quantity().value())
            .fold(0, i64::saturating_add)
    }

    /// Saturates at `i64::MAX`.
    pub fn total_minimum_stock(&self) -> i64 {
        self.items
            .iter()
            .map(StockItem::minimum_stock)
            .fold(0, i64::saturating_add)
    }

    pub fn low_stock_items(&self) -> Vec<&StockItem> {
        self.items.iter().filter(|item| item.is_low_stock()).collect()
    }

    pub fn has_low_stock_items(&self) -> bool {
        self.items.iter().any(StockItem::is_low_stock)
    }

    /// Give a freshly persisted stock its identity; items follow.
    pub fn assign_id(&mut self, id: i64) {
        self.id = id;
        for item in &mut self.items {
            item.attach_to(id);
        }
    }
}

fn validate_category(category: &str) -> Result<String, DomainError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(DomainError::EmptyCategory);
    }
    Ok(category.to_owned())
}
