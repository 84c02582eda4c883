use std::{sync::Arc, time::Duration};

use log::*;
use serde::Serialize;
use tokio::sync::watch;

use crate::{
    catalog::CatalogCache,
    db::traits::ItemStore,
    db_types::ItemId,
    feed::{FeedEvent, FeedPoll, FeedSource, ValidationError},
};

pub const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Exponential backoff for feed reconnects.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max, next: initial }
    }

    /// The delay to wait before the next attempt. Each call doubles the following delay, up to the maximum.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}

/// Running totals for a feed consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerStats {
    pub received: u64,
    pub updates_applied: u64,
    pub deletes_applied: u64,
    pub rejected: u64,
    pub store_failures: u64,
    pub feed_errors: u64,
}

/// What became of a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Updated(ItemId),
    Deleted { id: ItemId, existed: bool },
    /// The message did not decode or validate, and was dropped.
    Rejected(ValidationError),
    /// The message was valid, but the store rejected the change. The message is not retried.
    StoreFailed(String),
}

/// Applies the item feed to the store and the catalog cache.
///
/// Each message is written to the store first and then to the cache, so a cache read-through can never see data that
/// is newer than the cache itself. Messages are acknowledged on receipt by the [`FeedSource`], whatever happens
/// next.
pub struct FeedConsumer<S, F> {
    store: S,
    cache: Arc<CatalogCache<S>>,
    feed: F,
    backoff: Backoff,
    stats: ConsumerStats,
}

impl<S, F> FeedConsumer<S, F>
where
    S: ItemStore,
    F: FeedSource,
{
    pub fn new(store: S, cache: Arc<CatalogCache<S>>, feed: F) -> Self {
        Self { store, cache, feed, backoff: Backoff::default(), stats: ConsumerStats::default() }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn stats(&self) -> ConsumerStats {
        self.stats
    }

    /// Consumes the feed until it closes or `shutdown` is signalled.
    ///
    /// Shutdown is signalled by sending `true`, or by dropping the sender. It is checked between messages, and it
    /// interrupts the wait when the feed is empty. A receive that has started always runs to completion and its
    /// message is applied, so stopping never drops an acknowledged message.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ConsumerStats {
        info!("📬️ Feed consumer started");
        loop {
            if shutdown_requested(&shutdown) {
                info!("📬️ Shutdown signal received. Feed consumer is stopping");
                break;
            }
            match self.feed.try_next_message().await {
                Ok(FeedPoll::Message(msg)) => {
                    self.backoff.reset();
                    trace!("📬️ Message #{:?} received", msg.sequence);
                    self.process_message(&msg.payload).await;
                },
                Ok(FeedPoll::Empty) => {
                    tokio::select! {
                        biased;
                        _ = shutdown_signalled(&mut shutdown) => {
                            info!("📬️ Shutdown signal received while idle. Feed consumer is stopping");
                            break;
                        },
                        _ = self.feed.wait_for_message() => {},
                    }
                },
                Ok(FeedPoll::Closed) => {
                    info!("📬️ The feed has closed. Feed consumer is stopping");
                    break;
                },
                Err(e) => {
                    self.stats.feed_errors += 1;
                    let delay = self.backoff.next_delay();
                    warn!("📬️ Feed error. Retrying in {}ms. {e}", delay.as_millis());
                    tokio::select! {
                        biased;
                        _ = shutdown_signalled(&mut shutdown) => {
                            info!("📬️ Shutdown signal received while waiting to retry. Feed consumer is stopping");
                            break;
                        },
                        _ = tokio::time::sleep(delay) => {},
                    }
                },
            }
        }
        info!("📬️ Feed consumer stopped. {:?}", self.stats);
        self.stats
    }

    /// Decodes a single message and applies it. Never fails: every problem is logged and reported in the outcome.
    pub async fn process_message(&mut self, payload: &[u8]) -> MessageOutcome {
        self.stats.received += 1;
        let event = match FeedEvent::decode(payload) {
            Ok(ev) => ev,
            Err(e) => {
                self.stats.rejected += 1;
                warn!("📬️ Dropping invalid feed message. {e}. Body: {}", String::from_utf8_lossy(payload));
                return MessageOutcome::Rejected(e);
            },
        };
        match event {
            FeedEvent::ItemUpdated(item) => {
                let id = item.id;
                if let Err(e) = self.store.upsert_item(&item).await {
                    self.stats.store_failures += 1;
                    error!("📬️ Could not save update for item #{id}. The update is lost. {e}");
                    return MessageOutcome::StoreFailed(e.to_string());
                }
                self.cache.upsert(item);
                self.stats.updates_applied += 1;
                debug!("📬️ Item #{id} updated");
                MessageOutcome::Updated(id)
            },
            FeedEvent::ItemDeleted(id) => {
                let existed = match self.store.delete_item(id).await {
                    Ok(existed) => existed,
                    Err(e) => {
                        self.stats.store_failures += 1;
                        error!("📬️ Could not delete item #{id}. The delete is lost. {e}");
                        return MessageOutcome::StoreFailed(e.to_string());
                    },
                };
                self.cache.remove(id);
                self.stats.deletes_applied += 1;
                debug!("📬️ Item #{id} deleted (existed: {existed})");
                MessageOutcome::Deleted { id, existed }
            },
        }
    }
}

fn shutdown_requested(rx: &watch::Receiver<bool>) -> bool {
    *rx.borrow() || rx.has_changed().is_err()
}

/// Resolves once `true` has been sent, or the sender has gone away.
async fn shutdown_signalled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
