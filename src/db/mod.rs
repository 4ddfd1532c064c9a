//! Normalized store access
//!
//! SQLite via sqlx. Opening the store creates the database file and the
//! full relational schema if missing; creation is idempotent.

pub mod schema;

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (or create) the store at `db_path` and ensure the schema exists.
pub async fn open_store(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new store: {}", db_path.display());
    } else {
        info!("Opened existing store: {}", db_path.display());
    }

    // Referential completeness is part of the normalizer's contract;
    // enforce it rather than trusting it
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    schema::create_all_tables(&pool).await?;

    Ok(pool)
}

/// Open an in-memory store with the full schema, for tests.
pub async fn open_memory_store() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    schema::create_all_tables(&pool).await?;
    Ok(pool)
}
