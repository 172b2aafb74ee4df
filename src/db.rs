//! Database module
//!
//! Pool construction and schema migration.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Embedded schema, applied at startup. Every statement is idempotent.
const MIGRATION_001_INITIAL: &str = include_str!("../migrations/001_initial.sql");

/// Open the database, creating the file when missing. Foreign keys are
/// enforced on every connection; the delete-protection guarantees depend
/// on that.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Apply the embedded schema.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(MIGRATION_001_INITIAL).execute(pool).await?;
    Ok(())
}
