//! Stock use cases, each one behind the stock guard.

use stockroom_core::error::{AccessDenied, DomainError, StockroomError, StockroomResult};
use stockroom_core::models::collaborator::StockCollaborator;
use stockroom_core::models::permission::Permission;
use stockroom_core::models::stock::{CreateStock, NewStockItem, Stock};
use stockroom_core::models::stock_role::StockRole;
use stockroom_core::models::summary::{StockItemView, StockSummary};
use stockroom_core::repository::{StockRepository, UserRepository};
use tracing::info;

use crate::config::AccessConfig;
use crate::guard::{Caller, StockGrant, StockGuard, resolve_user};

/// Input for creating a stock. The caller becomes its owner.
#[derive(Debug, Clone)]
pub struct CreateStockInput {
    pub label: String,
    pub description: String,
    pub category: String,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateStockInput {
    pub label: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

pub type AddItemInput = NewStockItem;

/// Stock service.
///
/// Generic over repository implementations so that the access layer
/// has no dependency on the database crate.
pub struct StockService<U: UserRepository, S: StockRepository> {
    user_repo: U,
    stock_repo: S,
    config: AccessConfig,
}

impl<U: UserRepository, S: StockRepository> StockService<U, S> {
    pub fn new(user_repo: U, stock_repo: S, config: AccessConfig) -> Self {
        Self {
            user_repo,
            stock_repo,
            config,
        }
    }

    pub async fn create_stock(
        &self,
        caller: &Caller,
        input: CreateStockInput,
    ) -> StockroomResult<Stock> {
        let user_id = self.authenticated(caller).await?;

        let stock = Stock::create(CreateStock {
            id: None,
            label: input.label,
            description: input.description,
            category: input.category,
            user_id,
        })?;
        let stock = self.stock_repo.save(stock).await?;

        info!(stock_id = stock.id(), user_id, "Stock created");
        Ok(stock)
    }

    pub async fn update_stock(
        &self,
        caller: &Caller,
        stock_id: &str,
        input: UpdateStockInput,
    ) -> StockroomResult<Stock> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        let mut stock = self.load(grant.stock_id).await?;

        if input.label.is_some() || input.description.is_some() {
            let label = input
                .label
                .unwrap_or_else(|| stock.label().value().to_owned());
            let description = input
                .description
                .unwrap_or_else(|| stock.description().value().to_owned());
            stock.update_info(&label, &description)?;
        }
        if let Some(category) = input.category {
            stock.update_category(&category)?;
        }

        let stock = self.stock_repo.save(stock).await?;
        info!(stock_id = stock.id(), user_id = grant.user_id, "Stock updated");
        Ok(stock)
    }

    pub async fn delete_stock(&self, caller: &Caller, stock_id: &str) -> StockroomResult<()> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        self.stock_repo.delete(grant.stock_id).await?;

        info!(stock_id = grant.stock_id, user_id = grant.user_id, "Stock deleted");
        Ok(())
    }

    pub async fn add_item(
        &self,
        caller: &Caller,
        stock_id: &str,
        input: AddItemInput,
    ) -> StockroomResult<Stock> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        let mut stock = self.load(grant.stock_id).await?;

        let label = stock.add_item(input)?.label().to_owned();
        let stock = self.stock_repo.save(stock).await?;

        info!(stock_id = stock.id(), user_id = grant.user_id, item = %label, "Item added");
        Ok(stock)
    }

    pub async fn update_item_quantity(
        &self,
        caller: &Caller,
        stock_id: &str,
        item_id: i64,
        quantity: i64,
    ) -> StockroomResult<Stock> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        let mut stock = self.load(grant.stock_id).await?;

        stock.update_item_quantity(item_id, quantity)?;
        let stock = self.stock_repo.save(stock).await?;

        info!(stock_id = stock.id(), item_id, quantity, "Item quantity updated");
        Ok(stock)
    }

    pub async fn remove_item(
        &self,
        caller: &Caller,
        stock_id: &str,
        item_id: i64,
    ) -> StockroomResult<Stock> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        let mut stock = self.load(grant.stock_id).await?;

        stock.remove_item(item_id)?;
        let stock = self.stock_repo.save(stock).await?;

        info!(stock_id = stock.id(), item_id, "Item removed");
        Ok(stock)
    }

    /// Owned stocks first, then stocks shared with the caller.
    pub async fn list_stocks(&self, caller: &Caller) -> StockroomResult<Vec<StockSummary>> {
        let user_id = self.authenticated(caller).await?;

        let mut stocks = self.stock_repo.list_by_owner(user_id).await?;
        for shared in self.stock_repo.list_shared_with(user_id).await? {
            if !stocks.iter().any(|s| s.id() == shared.id()) {
                stocks.push(shared);
            }
        }

        Ok(stocks
            .iter()
            .map(|stock| StockSummary::from_stock(stock, &self.config.unit))
            .collect())
    }

    pub async fn stock_details(
        &self,
        caller: &Caller,
        stock_id: &str,
    ) -> StockroomResult<StockSummary> {
        let grant = self.authorize(caller, stock_id, Permission::Read).await?;
        let stock = self.load(grant.stock_id).await?;
        Ok(StockSummary::from_stock(&stock, &self.config.unit))
    }

    pub async fn stock_items(
        &self,
        caller: &Caller,
        stock_id: &str,
    ) -> StockroomResult<Vec<StockItemView>> {
        let grant = self.authorize(caller, stock_id, Permission::Read).await?;
        let stock = self.load(grant.stock_id).await?;
        Ok(stock.items().iter().map(StockItemView::from).collect())
    }

    pub async fn low_stock_items(
        &self,
        caller: &Caller,
        stock_id: &str,
    ) -> StockroomResult<Vec<StockItemView>> {
        let grant = self.authorize(caller, stock_id, Permission::Read).await?;
        let stock = self.load(grant.stock_id).await?;
        Ok(stock
            .low_stock_items()
            .into_iter()
            .map(StockItemView::from)
            .collect())
    }

    /// Grant `role` on the stock to another user. Owner only.
    pub async fn share_stock(
        &self,
        caller: &Caller,
        stock_id: &str,
        user_id: i64,
        role: StockRole,
    ) -> StockroomResult<()> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        require_owner(&grant, "share")?;

        if role.is_owner() {
            return Err(DomainError::InvalidRole {
                kind: "collaborator",
                value: role.to_string(),
                allowed: StockRole::ALL
                    .into_iter()
                    .filter(|r| !r.is_owner())
                    .map(StockRole::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .into());
        }
        if user_id == grant.user_id {
            return Err(DomainError::OwnerAsCollaborator.into());
        }
        // Fails with NotFound for an unknown user.
        self.user_repo.get_by_id(user_id).await?;

        self.stock_repo
            .upsert_collaborator(grant.stock_id, user_id, role)
            .await?;

        info!(stock_id = grant.stock_id, user_id, role = %role, "Stock shared");
        Ok(())
    }

    /// Withdraw a collaborator's role. Owner only.
    pub async fn revoke_share(
        &self,
        caller: &Caller,
        stock_id: &str,
        user_id: i64,
    ) -> StockroomResult<()> {
        let grant = self.authorize(caller, stock_id, Permission::Write).await?;
        require_owner(&grant, "share")?;

        if !self
            .stock_repo
            .remove_collaborator(grant.stock_id, user_id)
            .await?
        {
            return Err(StockroomError::NotFound {
                entity: "collaborator".into(),
                id: format!("{}/{user_id}", grant.stock_id),
            });
        }

        info!(stock_id = grant.stock_id, user_id, "Stock share revoked");
        Ok(())
    }

    pub async fn collaborators(
        &self,
        caller: &Caller,
        stock_id: &str,
    ) -> StockroomResult<Vec<StockCollaborator>> {
        let grant = self.authorize(caller, stock_id, Permission::Read).await?;
        self.stock_repo.list_collaborators(grant.stock_id).await
    }

    async fn authenticated(&self, caller: &Caller) -> StockroomResult<i64> {
        resolve_user(&self.user_repo, caller)
            .await?
            .map_err(StockroomError::from)
    }

    async fn authorize(
        &self,
        caller: &Caller,
        stock_id: &str,
        permission: Permission,
    ) -> StockroomResult<StockGrant> {
        StockGuard::new(&self.user_repo, &self.stock_repo)
            .authorize(caller, stock_id, permission)
            .await?
            .into_result()
    }

    /// The stock passed the guard but may have been deleted since.
    async fn load(&self, stock_id: i64) -> StockroomResult<Stock> {
        self.stock_repo
            .load_with_items(stock_id)
            .await?
            .ok_or_else(|| StockroomError::NotFound {
                entity: "stock".into(),
                id: stock_id.to_string(),
            })
    }
}

fn require_owner(grant: &StockGrant, action: &str) -> Result<(), AccessDenied> {
    if grant.is_owner {
        Ok(())
    } else {
        Err(AccessDenied::InsufficientRole {
            role: grant.role.to_string(),
            permission: action.to_owned(),
        })
    }
}
