//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn migrated() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    stockroom_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = migrated().await;

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in [
        "_counter",
        "user",
        "stock",
        "stock_item",
        "stock_collaborator",
        "family",
        "family_member",
        "_migration",
    ] {
        assert!(info_str.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = migrated().await;
    stockroom_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_emails() {
    let db = migrated().await;

    db.query("CREATE user:1 SET email = 'ana@example.com', display_name = 'Ana'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE user:2 SET email = 'ana@example.com', display_name = 'Other'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate email should be rejected");
}

#[tokio::test]
async fn negative_item_quantity_is_rejected() {
    let db = migrated().await;

    let result = db
        .query(
            "CREATE stock_item:1 SET stock_id = 1, label = 'Rice', \
             quantity = -1, minimum_stock = 1, position = 0",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "negative quantity should be rejected");
}

#[tokio::test]
async fn unknown_collaborator_role_is_rejected() {
    let db = migrated().await;

    let result = db
        .query("CREATE stock_collaborator SET stock_id = 1, user_id = 2, role = 'ADMIN'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "ADMIN is not a stock role");
}
