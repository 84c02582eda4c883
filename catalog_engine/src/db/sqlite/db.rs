use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{kv, new_memory_pool, new_pool, SqliteStoreError};
use crate::{
    db::{
        keys::{cart_key, item_key, ITEM_PREFIX},
        traits::{CartStore, ItemStore, StoreBackend},
    },
    db_types::{Item, ItemId, UserId},
};

#[derive(Clone)]
pub struct SqliteStore {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteStore ({:?})", self.pool)
    }
}

impl SqliteStore {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteStoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// A private, non-durable store. Useful for tests and throwaway instances.
    pub async fn new_in_memory() -> Result<Self, SqliteStoreError> {
        let pool = new_memory_pool().await?;
        Ok(Self { url: "sqlite::memory:".to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start.
    pub async fn migrate(&self) -> Result<(), SqliteStoreError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete for {}", self.url);
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), SqliteStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

fn decode_item(key: &str, value: &str) -> Result<Item, SqliteStoreError> {
    serde_json::from_str::<Item>(value)
        .map_err(|e| SqliteStoreError::CorruptRecord { key: key.to_string(), reason: e.to_string() })
}

impl StoreBackend for SqliteStore {
    type Error = SqliteStoreError;
}

impl ItemStore for SqliteStore {
    async fn upsert_item(&self, item: &Item) -> Result<(), Self::Error> {
        let value = serde_json::to_string(item)?;
        let mut conn = self.pool.acquire().await?;
        kv::put_value(&item_key(item.id), &value, &mut conn).await?;
        debug!("🗃️ Item #{} saved", item.id);
        Ok(())
    }

    async fn upsert_items(&self, items: &[Item]) -> Result<usize, Self::Error> {
        let mut tx = self.pool.begin().await?;
        for item in items {
            let value = serde_json::to_string(item)?;
            kv::put_value(&item_key(item.id), &value, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ {} items saved", items.len());
        Ok(items.len())
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let deleted = kv::delete_value(&item_key(id), &mut conn).await?;
        if deleted {
            debug!("🗃️ Item #{id} deleted");
        } else {
            debug!("🗃️ Item #{id} was not in the store. Nothing to delete.");
        }
        Ok(deleted)
    }

    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>, Self::Error> {
        let key = item_key(id);
        let mut conn = self.pool.acquire().await?;
        kv::get_value(&key, &mut conn).await?.map(|v| decode_item(&key, &v)).transpose()
    }

    /// Corrupt records are skipped (and logged) so that one bad entry cannot take the whole catalog down.
    async fn fetch_all_items(&self) -> Result<Vec<Item>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let records = kv::values_with_prefix(ITEM_PREFIX, &mut conn).await?;
        let mut items = records
            .into_iter()
            .filter_map(|(key, value)| decode_item(&key, &value).map_err(|e| error!("🗃️ Skipping record. {e}")).ok())
            .collect::<Vec<Item>>();
        // Keys sort lexically ("item:10" < "item:9"), so restore numeric order
        items.sort_by_key(|i| i.id);
        trace!("🗃️ Fetched {} items", items.len());
        Ok(items)
    }
}

impl CartStore for SqliteStore {
    async fn add_to_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let added = kv::set_add(&cart_key(user), &item.to_string(), &mut conn).await?;
        trace!("🗃️ Cart for user #{user}: add item #{item} (new entry: {added})");
        Ok(added)
    }

    async fn remove_from_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let removed = kv::set_remove(&cart_key(user), &item.to_string(), &mut conn).await?;
        trace!("🗃️ Cart for user #{user}: remove item #{item} (was present: {removed})");
        Ok(removed)
    }

    async fn is_in_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        kv::set_contains(&cart_key(user), &item.to_string(), &mut conn).await
    }

    async fn cart_item_ids(&self, user: UserId) -> Result<Vec<ItemId>, Self::Error> {
        let key = cart_key(user);
        let mut conn = self.pool.acquire().await?;
        let members = kv::set_members(&key, &mut conn).await?;
        let mut ids = members
            .into_iter()
            .filter_map(|m| {
                m.parse::<i64>().map(ItemId).map_err(|e| warn!("🗃️ Ignoring invalid member '{m}' in {key}. {e}")).ok()
            })
            .collect::<Vec<ItemId>>();
        ids.sort();
        Ok(ids)
    }

    async fn clear_cart(&self, user: UserId) -> Result<u64, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let removed = kv::delete_set(&cart_key(user), &mut conn).await?;
        debug!("🗃️ Cart for user #{user} cleared ({removed} entries)");
        Ok(removed)
    }
}
