use std::collections::BTreeMap;

use log::*;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    db::traits::ItemStore,
    db_types::{Item, ItemId},
};

pub const DEFAULT_PAGE_SIZE: usize = 3;

/// One page of the catalog, ordered by item id. Pages are numbered from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<Item>,
}

impl CatalogPage {
    fn from_items(items: &BTreeMap<ItemId, Item>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page);
        let items = items.values().skip(page.saturating_mul(per_page)).take(per_page).cloned().collect();
        Self { page, per_page, total_pages, total_items, items }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0 && self.total_pages > 0
    }
}

struct CacheState {
    /// `None` while cold.
    items: Option<BTreeMap<ItemId, Item>>,
    /// Bumped on every mutation, so that a read-through can tell whether the store snapshot it took is still current.
    generation: u64,
}

/// A lock-protected, read-through mirror of the items in an [`ItemStore`].
///
/// All access to the item map goes through one mutex. The lock is only held to mutate or copy the map and is never
/// held across a store call, so the feed consumer cannot end up waiting behind a slow reader. Every read returns
/// owned copies.
///
/// While the cache is cold, `upsert` and `remove` leave it cold: the store already holds the change and the next
/// read picks it up. This keeps a cold cache from turning into a partial mirror.
pub struct CatalogCache<S> {
    store: S,
    state: Mutex<CacheState>,
}

impl<S> CatalogCache<S> {
    pub fn new(store: S) -> Self {
        Self { store, state: Mutex::new(CacheState { items: None, generation: 0 }) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Inserts or replaces the item. Readers see either the old record or the new one in full.
    pub fn upsert(&self, item: Item) {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(items) = state.items.as_mut() {
            trace!("📚️ Cache: upsert item #{}", item.id);
            items.insert(item.id, item);
        }
    }

    /// Removes the item. Returns `true` if it was in the (warm) cache.
    pub fn remove(&self, id: ItemId) -> bool {
        let mut state = self.state.lock();
        state.generation += 1;
        let removed = state.items.as_mut().and_then(|items| items.remove(&id)).is_some();
        trace!("📚️ Cache: remove item #{id} (was cached: {removed})");
        removed
    }

    /// Drops the in-memory copy. The next read repopulates it from the store.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.items = None;
        debug!("📚️ Catalog cache invalidated");
    }

    pub fn is_warm(&self) -> bool {
        self.state.lock().items.is_some()
    }

    /// Number of cached items. A cold cache reports zero.
    pub fn len(&self) -> usize {
        self.state.lock().items.as_ref().map(BTreeMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> CatalogCache<S>
where S: ItemStore
{
    /// Every item in the catalog, ordered by id.
    pub async fn get_all(&self) -> Result<Vec<Item>, S::Error> {
        self.read(|items| items.values().cloned().collect()).await
    }

    pub async fn get(&self, id: ItemId) -> Result<Option<Item>, S::Error> {
        self.read(|items| items.get(&id).cloned()).await
    }

    /// Resolves the given ids. Ids that are not in the catalog are silently left out.
    pub async fn get_many(&self, ids: &[ItemId]) -> Result<Vec<Item>, S::Error> {
        self.read(|items| ids.iter().filter_map(|id| items.get(id).cloned()).collect()).await
    }

    pub async fn page(&self, page: usize, per_page: usize) -> Result<CatalogPage, S::Error> {
        self.read(|items| CatalogPage::from_items(items, page, per_page)).await
    }

    /// Runs `f` against the cached items, filling the cache from the store first if it is cold.
    ///
    /// The store snapshot is only installed if nothing touched the cache while it was being read. Otherwise a feed
    /// update that landed in the meantime could be overwritten by older data. The caller still gets an answer from
    /// the snapshot, and the next read tries again.
    async fn read<R, F>(&self, f: F) -> Result<R, S::Error>
    where F: FnOnce(&BTreeMap<ItemId, Item>) -> R {
        let generation = {
            let state = self.state.lock();
            match &state.items {
                Some(items) => return Ok(f(items)),
                None => state.generation,
            }
        };
        trace!("📚️ Catalog cache is cold. Reading through to the store.");
        let items = self.store.fetch_all_items().await?;
        let snapshot = items.into_iter().map(|item| (item.id, item)).collect::<BTreeMap<ItemId, Item>>();
        let result = f(&snapshot);
        let mut state = self.state.lock();
        if state.items.is_none() && state.generation == generation {
            debug!("📚️ Catalog cache filled with {} items", snapshot.len());
            state.items = Some(snapshot);
        } else {
            debug!("📚️ Catalog changed during read-through. Snapshot not cached.");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::{
        test_utils::prepare_env::{prepare_test_env, test_item},
        ItemStore,
    };

    #[tokio::test]
    async fn cold_cache_reads_through_to_store() {
        let store = prepare_test_env().await;
        store.upsert_items(&[test_item(2, "B", 200), test_item(1, "A", 100)]).await.unwrap();
        let cache = CatalogCache::new(store.clone());
        assert!(!cache.is_warm());
        let items = cache.get_all().await.unwrap();
        assert_eq!(items.iter().map(|i| i.id.value()).collect::<Vec<_>>(), vec![1, 2]);
        assert!(cache.is_warm());
        // Served from memory from now on
        store.delete_item(ItemId(1)).await.unwrap();
        assert_eq!(cache.get_all().await.unwrap().len(), 2);
        cache.invalidate();
        assert_eq!(cache.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let store = prepare_test_env().await;
        let cache = CatalogCache::new(store);
        cache.get_all().await.unwrap();
        cache.upsert(test_item(5, "First", 100));
        cache.upsert(test_item(5, "Second", 120));
        let items = cache.get_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Second");
        assert_eq!(items[0].price.cents(), 120);
    }

    #[tokio::test]
    async fn removing_unknown_item_is_a_no_op() {
        let store = prepare_test_env().await;
        store.upsert_item(&test_item(1, "A", 100)).await.unwrap();
        let cache = CatalogCache::new(store);
        cache.get_all().await.unwrap();
        assert!(!cache.remove(ItemId(999)));
        assert_eq!(cache.len(), 1);
        assert!(cache.remove(ItemId(1)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn cold_cache_stays_cold_on_mutation() {
        let store = prepare_test_env().await;
        store.upsert_items(&[test_item(1, "A", 100), test_item(2, "B", 200)]).await.unwrap();
        let cache = CatalogCache::new(store.clone());
        let item = test_item(3, "C", 300);
        store.upsert_item(&item).await.unwrap();
        cache.upsert(item);
        assert!(!cache.is_warm());
        // The full catalog is served, not just the one item that arrived while cold
        assert_eq!(cache.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn returned_items_are_copies() {
        let store = prepare_test_env().await;
        store.upsert_item(&test_item(1, "A", 100)).await.unwrap();
        let cache = CatalogCache::new(store);
        let mut items = cache.get_all().await.unwrap();
        items[0].name = "Mutated".into();
        items.clear();
        assert_eq!(cache.get(ItemId(1)).await.unwrap().unwrap().name, "A");
    }

    #[tokio::test]
    async fn get_many_drops_unknown_ids() {
        let store = prepare_test_env().await;
        store.upsert_items(&[test_item(1, "A", 100), test_item(2, "B", 200)]).await.unwrap();
        let cache = CatalogCache::new(store);
        let items = cache.get_many(&[ItemId(2), ItemId(42), ItemId(1)]).await.unwrap();
        assert_eq!(items.iter().map(|i| i.id.value()).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn pagination() {
        let store = prepare_test_env().await;
        let items = (1..=7).map(|i| test_item(i, "X", 100)).collect::<Vec<_>>();
        store.upsert_items(&items).await.unwrap();
        let cache = CatalogCache::new(store);
        let first = cache.page(0, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 7);
        assert_eq!(first.items.len(), 3);
        assert!(first.has_next());
        assert!(!first.has_previous());
        let last = cache.page(2, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(last.items.iter().map(|i| i.id.value()).collect::<Vec<_>>(), vec![7]);
        assert!(!last.has_next());
        assert!(last.has_previous());
        let beyond = cache.page(10, DEFAULT_PAGE_SIZE).await.unwrap();
        assert!(beyond.items.is_empty());
        let zero = cache.page(0, 0).await.unwrap();
        assert_eq!(zero.per_page, 1);
        assert_eq!(zero.total_pages, 7);
    }

    #[tokio::test]
    async fn concurrent_readers_and_writer() {
        let store = prepare_test_env().await;
        store.upsert_item(&test_item(1, "v0", 0)).await.unwrap();
        let cache = Arc::new(CatalogCache::new(store));
        cache.get_all().await.unwrap();
        let writer = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for v in 1..=200 {
                    cache.upsert(test_item(1, &format!("v{v}"), v));
                    tokio::task::yield_now().await;
                }
            })
        };
        let mut readers = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let item = cache.get(ItemId(1)).await.unwrap().unwrap();
                    // name and price are always written together
                    assert_eq!(item.name, format!("v{}", item.price.cents()));
                    tokio::task::yield_now().await;
                }
            }));
        }
        writer.await.unwrap();
        for r in readers {
            r.await.unwrap();
        }
        assert_eq!(cache.get(ItemId(1)).await.unwrap().unwrap().name, "v200");
    }
}
