//! Database initialization
//!
//! Creates the database on first run and brings the schema up idempotently;
//! a missing database file never causes startup to fail.

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

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation is idempotent (CREATE TABLE IF NOT EXISTS)
    create_schema_version_table(&pool).await?;
    create_canvas_assignments_table(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (1)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the persisted assignments table
///
/// One row per synced assignment; uniqueness on `(user_id, assignment_id)`
/// so repeated syncs overwrite rather than duplicate.
pub async fn create_canvas_assignments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS canvas_assignments (
            user_id TEXT NOT NULL,
            assignment_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            course_name TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            due_at TEXT,
            points_possible REAL,
            grading_type TEXT,
            html_url TEXT,
            created_at_raw TEXT,
            updated_at_raw TEXT,
            source TEXT NOT NULL DEFAULT 'canvas',
            raw TEXT NOT NULL,
            synced_at TEXT NOT NULL,
            PRIMARY KEY (user_id, assignment_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Read path orders by due date per user
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_canvas_assignments_user_due
         ON canvas_assignments (user_id, due_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
