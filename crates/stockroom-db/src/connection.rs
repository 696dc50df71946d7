//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Where the stockroom data lives.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `host:port` of the SurrealDB WebSocket endpoint.
    pub url: String,
    /// Namespace holding the stockroom database, `stockroom` by default.
    pub namespace: String,
    /// Database inside that namespace.
    pub database: String,
    /// Root user the server signs in as.
    pub username: String,
    /// Password of the root user.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "stockroom".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Owns the WebSocket client shared by every repository.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, sign in as root, and select the configured namespace and
    /// database.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Stockroom database ready");

        Ok(Self { db })
    }

    /// Shared client the repositories are built from.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    /// Apply pending schema migrations on this connection.
    pub async fn migrate(&self) -> Result<(), DbError> {
        crate::schema::run_migrations(&self.db).await
    }
}
