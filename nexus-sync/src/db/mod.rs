//! Database access for nexus-sync

pub mod assignments;

use nexus_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database connection pool and schema
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    nexus_common::db::init::init_database(db_path).await
}
