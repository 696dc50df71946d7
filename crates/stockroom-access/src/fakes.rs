//! In-memory repositories for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use stockroom_core::error::{StockroomError, StockroomResult};
use stockroom_core::models::collaborator::StockCollaborator;
use stockroom_core::models::family::Family;
use stockroom_core::models::stock::Stock;
use stockroom_core::models::stock_role::StockRole;
use stockroom_core::models::user::{CreateUser, User};
use stockroom_core::repository::{
    FamilyRepository, StockOwnership, StockRepository, UserRepository,
};

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<Vec<User>>,
}

impl FakeUsers {
    pub fn with(entries: &[(i64, &str)]) -> Self {
        let users = entries
            .iter()
            .map(|(id, email)| User {
                id: *id,
                email: (*email).to_owned(),
                display_name: (*email).to_owned(),
                created_at: Utc::now(),
            })
            .collect();
        Self {
            users: Mutex::new(users),
        }
    }
}

impl UserRepository for FakeUsers {
    async fn create(&self, input: CreateUser) -> StockroomResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: input.email,
            display_name: input.display_name,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> StockroomResult<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StockroomError::NotFound {
                entity: "user".into(),
                id: id.to_string(),
            })
    }

    async fn find_id_by_email(&self, email: &str) -> StockroomResult<Option<i64>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id))
    }
}

#[derive(Default)]
pub struct FakeStocks {
    owners: Mutex<HashMap<i64, i64>>,
    stocks: Mutex<HashMap<i64, Stock>>,
    roles: Mutex<HashMap<(i64, i64), String>>,
    collaborator_lookups: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl FakeStocks {
    /// Register a bare stock row (no aggregate) owned by `owner`.
    pub fn insert_owned(&self, stock_id: i64, owner: i64) {
        self.owners.lock().unwrap().insert(stock_id, owner);
    }

    /// Store a raw role literal, valid or not.
    pub fn insert_role(&self, stock_id: i64, user_id: i64, role: &str) {
        self.roles
            .lock()
            .unwrap()
            .insert((stock_id, user_id), role.to_owned());
    }

    pub fn collaborator_lookups(&self) -> usize {
        self.collaborator_lookups.load(Ordering::SeqCst)
    }

    /// Make the next ownership lookup fail with a database error.
    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }
}

impl StockRepository for FakeStocks {
    async fn find_ownership(&self, stock_id: i64) -> StockroomResult<StockOwnership> {
        if let Some(message) = self.failure.lock().unwrap().take() {
            return Err(StockroomError::Database(message));
        }
        Ok(self
            .owners
            .lock()
            .unwrap()
            .get(&stock_id)
            .map_or(StockOwnership::MISSING, |owner| {
                StockOwnership::owned_by(*owner)
            }))
    }

    async fn find_collaborator_role(
        &self,
        stock_id: i64,
        user_id: i64,
    ) -> StockroomResult<Option<String>> {
        self.collaborator_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&(stock_id, user_id))
            .cloned())
    }

    async fn load_with_items(&self, stock_id: i64) -> StockroomResult<Option<Stock>> {
        Ok(self.stocks.lock().unwrap().get(&stock_id).cloned())
    }

    async fn save(&self, mut stock: Stock) -> StockroomResult<Stock> {
        let mut owners = self.owners.lock().unwrap();
        if stock.id() == 0 {
            let next = owners.keys().max().copied().unwrap_or(0) + 1;
            stock.assign_id(next);
        }
        owners.insert(stock.id(), stock.user_id());
        self.stocks
            .lock()
            .unwrap()
            .insert(stock.id(), stock.clone());
        Ok(stock)
    }

    async fn delete(&self, stock_id: i64) -> StockroomResult<()> {
        self.owners.lock().unwrap().remove(&stock_id);
        self.stocks.lock().unwrap().remove(&stock_id);
        self.roles
            .lock()
            .unwrap()
            .retain(|(stock, _), _| *stock != stock_id);
        Ok(())
    }

    async fn list_by_owner(&self, user_id: i64) -> StockroomResult<Vec<Stock>> {
        let mut stocks: Vec<Stock> = self
            .stocks
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();
        stocks.sort_by_key(Stock::id);
        Ok(stocks)
    }

    async fn list_shared_with(&self, user_id: i64) -> StockroomResult<Vec<Stock>> {
        let ids: Vec<i64> = self
            .roles
            .lock()
            .unwrap()
            .keys()
            .filter(|(_, user)| *user == user_id)
            .map(|(stock, _)| *stock)
            .collect();
        let stocks = self.stocks.lock().unwrap();
        let mut shared: Vec<Stock> = ids.iter().filter_map(|id| stocks.get(id).cloned()).collect();
        shared.sort_by_key(Stock::id);
        Ok(shared)
    }

    async fn upsert_collaborator(
        &self,
        stock_id: i64,
        user_id: i64,
        role: StockRole,
    ) -> StockroomResult<()> {
        self.insert_role(stock_id, user_id, role.as_str());
        Ok(())
    }

    async fn remove_collaborator(&self, stock_id: i64, user_id: i64) -> StockroomResult<bool> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .remove(&(stock_id, user_id))
            .is_some())
    }

    async fn list_collaborators(&self, stock_id: i64) -> StockroomResult<Vec<StockCollaborator>> {
        let roles = self.roles.lock().unwrap();
        let mut collaborators = roles
            .iter()
            .filter(|((stock, _), _)| *stock == stock_id)
            .map(|((stock, user), role)| -> StockroomResult<StockCollaborator> {
                Ok(StockCollaborator {
                    stock_id: *stock,
                    user_id: *user,
                    role: role.parse()?,
                    created_at: Utc::now(),
                })
            })
            .collect::<StockroomResult<Vec<_>>>()?;
        collaborators.sort_by_key(|c| c.user_id);
        Ok(collaborators)
    }
}

#[derive(Default)]
pub struct FakeFamilies {
    families: Mutex<HashMap<i64, Family>>,
}

impl FamilyRepository for FakeFamilies {
    async fn load(&self, family_id: i64) -> StockroomResult<Option<Family>> {
        Ok(self.families.lock().unwrap().get(&family_id).cloned())
    }

    async fn save(&self, mut family: Family) -> StockroomResult<Family> {
        let mut families = self.families.lock().unwrap();
        if family.id() == 0 {
            let next = families.keys().max().copied().unwrap_or(0) + 1;
            family.assign_id(next);
        }
        families.insert(family.id(), family.clone());
        Ok(family)
    }

    async fn list_for_user(&self, user_id: i64) -> StockroomResult<Vec<Family>> {
        let mut families: Vec<Family> = self
            .families
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.is_member(user_id))
            .cloned()
            .collect();
        families.sort_by_key(Family::id);
        Ok(families)
    }
}
