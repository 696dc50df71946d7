//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use stockroom_core::error::StockroomResult;
use stockroom_core::models::user::{CreateUser, User};
use stockroom_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::next_id;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: i64) -> User {
        User {
            id,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: i64,
}

#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> StockroomResult<User> {
        let id = next_id(&self.db, "user").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, display_name = $display_name",
            )
            .bind(("id", id))
            .bind(("email", input.email))
            .bind(("display_name", input.display_name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_id(&self, id: i64) -> StockroomResult<User> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn find_id_by_email(&self, email: &str) -> StockroomResult<Option<i64>> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.record_id))
    }
}
