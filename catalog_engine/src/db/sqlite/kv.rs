//! Key-value primitives over the `kv_values` and `kv_sets` tables.
//!
//! Every function runs a single statement, so each call is atomic on its own. You can embed calls inside a
//! transaction if you need several of them to be atomic together, and pass `&mut *tx` as the connection argument.
use log::trace;
use sqlx::{Row, SqliteConnection};

use crate::db::sqlite::SqliteStoreError;

/// Returns the upper bound for a range scan over every key starting with `prefix`.
fn prefix_upper_bound(prefix: &str) -> String {
    let mut upper = prefix.to_string();
    if let Some(last) = upper.pop() {
        upper.push(char::from_u32(last as u32 + 1).unwrap_or(char::MAX));
    }
    upper
}

pub async fn get_value(key: &str, conn: &mut SqliteConnection) -> Result<Option<String>, SqliteStoreError> {
    let row = sqlx::query("SELECT value FROM kv_values WHERE key = $1").bind(key).fetch_optional(conn).await?;
    Ok(row.map(|r| r.get::<String, _>("value")))
}

pub async fn put_value(key: &str, value: &str, conn: &mut SqliteConnection) -> Result<(), SqliteStoreError> {
    sqlx::query(
        r#"
            INSERT INTO kv_values (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP;
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;
    trace!("🗃️ Stored {key}");
    Ok(())
}

/// Deletes the key. Returns `true` if it existed.
pub async fn delete_value(key: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteStoreError> {
    let result = sqlx::query("DELETE FROM kv_values WHERE key = $1").bind(key).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `(key, value)` pairs for every key starting with `prefix`, in key order.
pub async fn values_with_prefix(
    prefix: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, String)>, SqliteStoreError> {
    let rows = sqlx::query("SELECT key, value FROM kv_values WHERE key >= $1 AND key < $2 ORDER BY key")
        .bind(prefix)
        .bind(prefix_upper_bound(prefix))
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|r| (r.get::<String, _>("key"), r.get::<String, _>("value"))).collect())
}

/// Adds `member` to the set at `key`. Returns `true` if it was not already a member.
pub async fn set_add(key: &str, member: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteStoreError> {
    let result = sqlx::query("INSERT INTO kv_sets (key, member) VALUES ($1, $2) ON CONFLICT (key, member) DO NOTHING")
        .bind(key)
        .bind(member)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes `member` from the set at `key`. Returns `true` if it was a member.
pub async fn set_remove(key: &str, member: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteStoreError> {
    let result = sqlx::query("DELETE FROM kv_sets WHERE key = $1 AND member = $2")
        .bind(key)
        .bind(member)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_contains(key: &str, member: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteStoreError> {
    let row = sqlx::query("SELECT 1 AS present FROM kv_sets WHERE key = $1 AND member = $2")
        .bind(key)
        .bind(member)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

pub async fn set_members(key: &str, conn: &mut SqliteConnection) -> Result<Vec<String>, SqliteStoreError> {
    let rows = sqlx::query("SELECT member FROM kv_sets WHERE key = $1 ORDER BY member")
        .bind(key)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|r| r.get::<String, _>("member")).collect())
}

/// Deletes the whole set. Returns the number of members removed.
pub async fn delete_set(key: &str, conn: &mut SqliteConnection) -> Result<u64, SqliteStoreError> {
    let result = sqlx::query("DELETE FROM kv_sets WHERE key = $1").bind(key).execute(conn).await?;
    Ok(result.rows_affected())
}
