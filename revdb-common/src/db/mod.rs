//! Database access layer for revdb
//!
//! Owns connection pool creation and idempotent schema creation.
//! All durable state (users, sessions, catalog, reviews, comments)
//! lives here; request handlers hold no other shared mutable state.

pub mod models;
pub mod schema;

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc creates the database file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_pool(&pool).await?;

    // Run schema creation (idempotent - safe to call multiple times)
    schema::create_all_tables(&pool).await?;

    Ok(pool)
}

/// Create an in-memory database with the full schema.
///
/// A single connection is required: each in-memory SQLite connection
/// is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    configure_pool(&pool).await?;
    schema::create_all_tables(&pool).await?;

    Ok(pool)
}

async fn configure_pool(pool: &SqlitePool) -> Result<()> {
    // Foreign keys are off by default in SQLite; cascade semantics
    // for title -> review -> comment depend on them
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;

    Ok(())
}
