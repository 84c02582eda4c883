use std::{fmt::Debug, sync::Arc, time::Duration};

use catalog_engine::{
    feed::{FeedError, FeedPoll, FeedSource, SqliteFeed, DEFAULT_QUEUE_NAME},
    BootstrapReport,
    CartApi,
    CatalogCache,
    CheckoutApi,
    CheckoutError,
    ConsumerStats,
    FeedConsumer,
    OrderReceipt,
    SqliteStore,
};
use cucumber::World;
use log::*;
use tokio::sync::watch;

use catalog_engine::test_utils::{fake_backend::FakeBackend, prepare_env::prepare_test_env};

#[derive(Default, Debug, World)]
pub struct CatalogWorld {
    pub system: Option<CatalogSystem>,
    pub last_checkout: Option<Result<OrderReceipt, CheckoutError>>,
    pub last_bootstrap: Option<BootstrapReport>,
    pub feed_stats: ConsumerStats,
}

pub struct CatalogSystem {
    pub store: SqliteStore,
    pub cache: Arc<CatalogCache<SqliteStore>>,
    pub carts: CartApi<SqliteStore>,
    pub checkout: CheckoutApi<SqliteStore, FakeBackend>,
    pub backend: FakeBackend,
    pub feed: SqliteFeed,
}

impl Debug for CatalogSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogSystem({:?})", self.store)
    }
}

impl CatalogWorld {
    pub fn system(&self) -> &CatalogSystem {
        self.system.as_ref().expect("Catalog system not initialised")
    }
}

impl CatalogSystem {
    pub async fn new() -> Self {
        let store = prepare_test_env().await;
        let cache = Arc::new(CatalogCache::new(store.clone()));
        let carts = CartApi::new(store.clone(), Arc::clone(&cache));
        let backend = FakeBackend::new(1);
        let checkout = CheckoutApi::new(carts.clone(), backend.clone(), Default::default());
        let feed = SqliteFeed::new(&store, DEFAULT_QUEUE_NAME, Duration::from_millis(5));
        Self { store, cache, carts, checkout, backend, feed }
    }

    /// Runs a consumer over everything currently queued. The consumer stops once the queue is empty.
    pub async fn drain_feed(&self) -> ConsumerStats {
        let (_tx, rx) = watch::channel(false);
        let feed = UntilEmpty(self.feed.clone());
        let consumer = FeedConsumer::new(self.store.clone(), Arc::clone(&self.cache), feed);
        let stats = consumer.run(rx).await;
        debug!("🚀️ Feed drained. {stats:?}");
        stats
    }
}

/// Closes the feed as soon as the queue runs dry.
struct UntilEmpty(SqliteFeed);

impl FeedSource for UntilEmpty {
    async fn try_next_message(&mut self) -> Result<FeedPoll, FeedError> {
        match self.0.pop_message().await? {
            Some(msg) => Ok(FeedPoll::Message(msg)),
            None => Ok(FeedPoll::Closed),
        }
    }

    async fn wait_for_message(&mut self) {}
}
