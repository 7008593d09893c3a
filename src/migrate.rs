//! Database schema creation.
//!
//! The schema is a single `contacts` table with one column per attribute.
//! Creation is idempotent; there is no versioned migration history.
//! `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row
//! again.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the `contacts` table and its indexes if they don't exist.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            contact_group TEXT NOT NULL,
            position TEXT,
            office_home_number TEXT,
            gender TEXT NOT NULL,
            additional_phone1 TEXT,
            additional_phone2 TEXT,
            additional_phone3 TEXT,
            email TEXT,
            notes TEXT,
            address TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_contacts_group ON contacts(contact_group)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contacts_last_name ON contacts(last_name COLLATE NOCASE)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Open the configured database and create the schema. Used by `contacts init`.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    create_schema(&pool).await?;
    pool.close().await;
    tracing::info!(path = %config.db.path.display(), "database schema ready");
    Ok(())
}
