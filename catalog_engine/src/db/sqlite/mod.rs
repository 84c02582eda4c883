pub mod db;
mod errors;

pub mod kv;

use std::{str::FromStr, time::Duration};

pub use db::SqliteStore;
pub use errors::SqliteStoreError;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteStoreError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// An in-memory database lives and dies with its connection, so the pool is pinned to a single connection that is
/// never recycled.
pub async fn new_memory_pool() -> Result<SqlitePool, SqliteStoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;
    Ok(pool)
}
