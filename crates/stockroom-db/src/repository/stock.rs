//! SurrealDB implementation of [`StockRepository`].
//!
//! A stock is stored as one `stock` row plus its `stock_item` rows
//! (ordered by `position`) and its `stock_collaborator` rows. Collaborator
//! records are keyed by `"{stock_id}-{user_id}"` so a grant is an upsert.

use chrono::{DateTime, Utc};
use stockroom_core::error::StockroomResult;
use stockroom_core::models::collaborator::StockCollaborator;
use stockroom_core::models::stock::Stock;
use stockroom_core::models::stock_description::StockDescription;
use stockroom_core::models::stock_item::StockItem;
use stockroom_core::models::stock_label::StockLabel;
use stockroom_core::models::stock_role::StockRole;
use stockroom_core::repository::{StockOwnership, StockRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::next_id;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct StockRow {
    label: String,
    description: String,
    category: String,
    user_id: i64,
}

#[derive(Debug, SurrealValue)]
struct ItemRow {
    record_id: i64,
    label: String,
    description: String,
    quantity: i64,
    minimum_stock: i64,
}

#[derive(Debug, SurrealValue)]
struct ItemWrite {
    item_id: i64,
    label: String,
    description: String,
    quantity: i64,
    minimum_stock: i64,
    position: i64,
}

#[derive(Debug, SurrealValue)]
struct OwnerRow {
    user_id: i64,
}

#[derive(Debug, SurrealValue)]
struct RoleRow {
    role: String,
}

#[derive(Debug, SurrealValue)]
struct CollaboratorRow {
    stock_id: i64,
    user_id: i64,
    role: String,
    created_at: DateTime<Utc>,
}

impl StockRow {
    fn try_into_stock(self, id: i64, items: Vec<ItemRow>) -> Result<Stock, DbError> {
        let corrupt = |e: stockroom_core::error::DomainError| DbError::Corrupt {
            entity: "stock",
            id,
            reason: e.to_string(),
        };
        let label = StockLabel::new(&self.label).map_err(corrupt)?;
        let description = StockDescription::new(&self.description).map_err(corrupt)?;

        let items = items
            .into_iter()
            .map(|row| {
                let item_id = row.record_id;
                StockItem::new(
                    item_id,
                    row.label,
                    row.quantity,
                    row.description,
                    row.minimum_stock,
                    id,
                )
                .map_err(|e| DbError::Corrupt {
                    entity: "stock_item",
                    id: item_id,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Stock::from_parts(
            id,
            label,
            description,
            self.category,
            self.user_id,
            items,
        ))
    }
}

impl CollaboratorRow {
    fn try_into_collaborator(self) -> Result<StockCollaborator, DbError> {
        let role: StockRole = self.role.parse().map_err(|e: stockroom_core::error::DomainError| {
            DbError::Corrupt {
                entity: "stock_collaborator",
                id: self.stock_id,
                reason: e.to_string(),
            }
        })?;
        Ok(StockCollaborator {
            stock_id: self.stock_id,
            user_id: self.user_id,
            role,
            created_at: self.created_at,
        })
    }
}

fn collaborator_key(stock_id: i64, user_id: i64) -> String {
    format!("{stock_id}-{user_id}")
}

#[derive(Clone)]
pub struct SurrealStockRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStockRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Load each id in ascending order, skipping stocks deleted meanwhile.
    async fn load_many(&self, mut ids: Vec<i64>) -> StockroomResult<Vec<Stock>> {
        ids.sort_unstable();
        ids.dedup();

        let mut stocks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(stock) = self.load_with_items(id).await? {
                stocks.push(stock);
            }
        }
        Ok(stocks)
    }
}

impl<C: Connection> StockRepository for SurrealStockRepository<C> {
    async fn find_ownership(&self, stock_id: i64) -> StockroomResult<StockOwnership> {
        let mut result = self
            .db
            .query("SELECT user_id FROM type::record('stock', $id)")
            .bind(("id", stock_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OwnerRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map_or(StockOwnership::MISSING, |row| {
                StockOwnership::owned_by(row.user_id)
            }))
    }

    async fn find_collaborator_role(
        &self,
        stock_id: i64,
        user_id: i64,
    ) -> StockroomResult<Option<String>> {
        let mut result = self
            .db
            .query("SELECT role FROM type::record('stock_collaborator', $key)")
            .bind(("key", collaborator_key(stock_id, user_id)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.role))
    }

    async fn load_with_items(&self, stock_id: i64) -> StockroomResult<Option<Stock>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('stock', $id); \
                 SELECT meta::id(id) AS record_id, * FROM stock_item \
                 WHERE stock_id = $id ORDER BY position ASC;",
            )
            .bind(("id", stock_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StockRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        let items: Vec<ItemRow> = result.take(1).map_err(DbError::from)?;

        Ok(Some(row.try_into_stock(stock_id, items)?))
    }

    async fn save(&self, mut stock: Stock) -> StockroomResult<Stock> {
        if stock.id() == 0 {
            let id = next_id(&self.db, "stock").await?;
            stock.assign_id(id);
        }
        let stock_id = stock.id();

        let mut items = Vec::with_capacity(stock.items().len());
        for (position, item) in stock.items().iter().enumerate() {
            let item_id = match item.id() {
                0 => next_id(&self.db, "stock_item").await?,
                id => id,
            };
            items.push(ItemWrite {
                item_id,
                label: item.label().to_owned(),
                description: item.description().to_owned(),
                quantity: item.quantity().value(),
                minimum_stock: item.minimum_stock(),
                position: position as i64,
            });
        }
        let keep: Vec<i64> = items.iter().map(|item| item.item_id).collect();

        // Parent row, removed items, then the remaining items, all or nothing.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 UPSERT type::record('stock', $id) SET \
                 label = $label, description = $description, \
                 category = $category, user_id = $user_id, \
                 updated_at = time::now(); \
                 DELETE stock_item WHERE stock_id = $id \
                 AND meta::id(id) NOT IN $keep; \
                 FOR $item IN $items { \
                 UPSERT type::record('stock_item', $item.item_id) SET \
                 stock_id = $id, label = $item.label, \
                 description = $item.description, quantity = $item.quantity, \
                 minimum_stock = $item.minimum_stock, position = $item.position; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", stock_id))
            .bind(("label", stock.label().value().to_owned()))
            .bind(("description", stock.description().value().to_owned()))
            .bind(("category", stock.category().to_owned()))
            .bind(("user_id", stock.user_id()))
            .bind(("keep", keep))
            .bind(("items", items))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        self.load_with_items(stock_id).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "stock".into(),
                id: stock_id.to_string(),
            }
            .into()
        })
    }

    async fn delete(&self, stock_id: i64) -> StockroomResult<()> {
        self.db
            .query(
                "DELETE stock_item WHERE stock_id = $id; \
                 DELETE stock_collaborator WHERE stock_id = $id; \
                 DELETE type::record('stock', $id);",
            )
            .bind(("id", stock_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_owner(&self, user_id: i64) -> StockroomResult<Vec<Stock>> {
        let mut result = self
            .db
            .query("SELECT VALUE meta::id(id) FROM stock WHERE user_id = $user_id")
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let ids: Vec<i64> = result.take(0).map_err(DbError::from)?;
        self.load_many(ids).await
    }

    async fn list_shared_with(&self, user_id: i64) -> StockroomResult<Vec<Stock>> {
        let mut result = self
            .db
            .query("SELECT VALUE stock_id FROM stock_collaborator WHERE user_id = $user_id")
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let ids: Vec<i64> = result.take(0).map_err(DbError::from)?;
        self.load_many(ids).await
    }

    async fn upsert_collaborator(
        &self,
        stock_id: i64,
        user_id: i64,
        role: StockRole,
    ) -> StockroomResult<()> {
        self.db
            .query(
                "UPSERT type::record('stock_collaborator', $key) SET \
                 stock_id = $stock_id, user_id = $user_id, role = $role",
            )
            .bind(("key", collaborator_key(stock_id, user_id)))
            .bind(("stock_id", stock_id))
            .bind(("user_id", user_id))
            .bind(("role", role.as_str().to_owned()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn remove_collaborator(&self, stock_id: i64, user_id: i64) -> StockroomResult<bool> {
        let result = self
            .db
            .query("DELETE type::record('stock_collaborator', $key) RETURN BEFORE")
            .bind(("key", collaborator_key(stock_id, user_id)))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CollaboratorRow> = result.take(0).map_err(DbError::from)?;
        Ok(!rows.is_empty())
    }

    async fn list_collaborators(&self, stock_id: i64) -> StockroomResult<Vec<StockCollaborator>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM stock_collaborator WHERE stock_id = $stock_id \
                 ORDER BY user_id ASC",
            )
            .bind(("stock_id", stock_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CollaboratorRow> = result.take(0).map_err(DbError::from)?;
        let collaborators = rows
            .into_iter()
            .map(CollaboratorRow::try_into_collaborator)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(collaborators)
    }
}
