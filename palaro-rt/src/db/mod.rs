//! Results store access for palaro-rt
//!
//! Connections are read-only; the service never writes to the store.

use palaro_common::db::missing_tables;
use palaro_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

mod snapshot;
pub use snapshot::load_snapshot;

/// Open the results store in read-only mode
///
/// `mode=ro` rejects writes and `immutable=1` stops SQLite from touching
/// journal or lock files.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::StoreNotFound(db_path.to_path_buf()));
    }

    let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;
    debug!(path = %db_path.display(), "Opened results store read-only");

    Ok(pool)
}

/// Fail unless every table the engine reads is present
pub async fn verify_schema(pool: &SqlitePool) -> Result<()> {
    let missing = missing_tables(pool).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingTables(missing))
    }
}
