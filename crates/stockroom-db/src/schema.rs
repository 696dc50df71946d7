//! Schema definitions and migration runner.
//!
//! Every table is SCHEMAFULL. Record keys are integers allocated from
//! `_counter`; references between tables are plain `int` fields. Role
//! enums are stored as their upper-case literals behind ASSERT
//! constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Identity sequences
-- =======================================================================
DEFINE TABLE _counter SCHEMAFULL;
DEFINE FIELD seq ON TABLE _counter TYPE int DEFAULT 0;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD display_name ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Stocks
-- =======================================================================
DEFINE TABLE stock SCHEMAFULL;
DEFINE FIELD label ON TABLE stock TYPE string;
DEFINE FIELD description ON TABLE stock TYPE string;
DEFINE FIELD category ON TABLE stock TYPE string;
DEFINE FIELD user_id ON TABLE stock TYPE int;
DEFINE FIELD created_at ON TABLE stock TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE stock TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_stock_owner ON TABLE stock COLUMNS user_id;

DEFINE TABLE stock_item SCHEMAFULL;
DEFINE FIELD stock_id ON TABLE stock_item TYPE int;
DEFINE FIELD label ON TABLE stock_item TYPE string;
DEFINE FIELD description ON TABLE stock_item TYPE string DEFAULT '';
DEFINE FIELD quantity ON TABLE stock_item TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD minimum_stock ON TABLE stock_item TYPE int DEFAULT 1;
DEFINE FIELD position ON TABLE stock_item TYPE int;
DEFINE INDEX idx_stock_item_stock ON TABLE stock_item \
    COLUMNS stock_id;

DEFINE TABLE stock_collaborator SCHEMAFULL;
DEFINE FIELD stock_id ON TABLE stock_collaborator TYPE int;
DEFINE FIELD user_id ON TABLE stock_collaborator TYPE int;
DEFINE FIELD role ON TABLE stock_collaborator TYPE string \
    ASSERT $value IN ['OWNER', 'EDITOR', 'VIEWER', \
    'VIEWER_CONTRIBUTOR'];
DEFINE FIELD created_at ON TABLE stock_collaborator TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_collaborator_stock_user ON TABLE stock_collaborator \
    COLUMNS stock_id, user_id UNIQUE;
DEFINE INDEX idx_collaborator_user ON TABLE stock_collaborator \
    COLUMNS user_id;

-- =======================================================================
-- Families
-- =======================================================================
DEFINE TABLE family SCHEMAFULL;
DEFINE FIELD name ON TABLE family TYPE string;
DEFINE FIELD created_at ON TABLE family TYPE datetime \
    DEFAULT time::now();

DEFINE TABLE family_member SCHEMAFULL;
DEFINE FIELD family_id ON TABLE family_member TYPE int;
DEFINE FIELD user_id ON TABLE family_member TYPE int;
DEFINE FIELD role ON TABLE family_member TYPE string \
    ASSERT $value IN ['ADMIN', 'MEMBER'];
DEFINE FIELD joined_at ON TABLE family_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_family_member_family_user ON TABLE family_member \
    COLUMNS family_id, user_id UNIQUE;
DEFINE INDEX idx_family_member_user ON TABLE family_member \
    COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Apply every migration newer than the recorded schema version.
///
/// The `_migration` table is created on first run; running twice is a
/// no-op.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// The version 1 DDL, for tests that bypass the runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
