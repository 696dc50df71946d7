//! Stockroom server entry point.

mod config;

use stockroom_access::{FamilyService, StockService};
use stockroom_db::{DbManager, SurrealFamilyRepository, SurrealStockRepository, SurrealUserRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockroom=info")),
        )
        .json()
        .init();

    info!("Starting stockroom server...");

    let config = ServerConfig::from_env();
    let db = DbManager::connect(&config.db).await?;
    db.migrate().await?;

    let client = db.client().clone();
    let _stocks = StockService::new(
        SurrealUserRepository::new(client.clone()),
        SurrealStockRepository::new(client.clone()),
        config.access.clone(),
    );
    let _families = FamilyService::new(
        SurrealUserRepository::new(client.clone()),
        SurrealFamilyRepository::new(client),
    );
    info!(unit = %config.access.unit, "Stock and family services ready");

    tokio::signal::ctrl_c().await?;

    info!("Stockroom server stopped.");
    Ok(())
}
