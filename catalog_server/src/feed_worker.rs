use std::sync::Arc;

use catalog_engine::{feed::SqliteFeed, CatalogCache, ConsumerStats, FeedConsumer, SqliteStore};
use log::*;
use tokio::{sync::watch, task::JoinHandle};

/// Starts the feed consumer. The task runs until `true` is sent on `shutdown` (or the sender is dropped), and then
/// returns the consumer's statistics. A message that has been received when shutdown is signalled is applied first.
pub fn start_feed_worker(
    store: SqliteStore,
    cache: Arc<CatalogCache<SqliteStore>>,
    feed: SqliteFeed,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<ConsumerStats> {
    tokio::spawn(async move {
        info!("📬️ Feed worker started on queue '{}'", feed.queue());
        let consumer = FeedConsumer::new(store, cache, feed);
        let stats = consumer.run(shutdown).await;
        info!(
            "📬️ Feed worker finished. {} messages received, {} updates, {} deletes, {} rejected",
            stats.received, stats.updates_applied, stats.deletes_applied, stats.rejected
        );
        stats
    })
}
