//! Catalog Sync Engine
//!
//! The catalog engine keeps a local replica of a product catalog in step with the backend that owns it, and serves
//! per-user shopping carts and order checkout against that replica.
//!
//! The library is divided into these sections:
//! 1. Storage ([`mod@db`]). A key-value store holds item records (`item:{id}`) and per-user cart sets
//!    (`cart:{user_id}`). Backends implement the [`ItemStore`] and [`CartStore`] traits. SQLite is the supported
//!    backend.
//! 2. The in-memory [`CatalogCache`], a read-through mirror of every item in the store.
//! 3. The update [`mod@feed`]. A long-running [`FeedConsumer`] applies item upserts and deletes from a message queue
//!    to the store and the cache.
//! 4. The public API ([`mod@cse_api`]): [`CartApi`], [`CheckoutApi`] and [`CatalogBootstrap`]. The authoritative
//!    backend is reached through the [`CatalogBackend`] trait.
//!
//! The engine also emits events that can be subscribed to. When an order is placed, an `OrderPlacedEvent` is sent to
//! every registered hook.
mod db;

pub mod catalog;
pub mod cse_api;
pub mod db_types;
pub mod events;
pub mod feed;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use catalog::{CatalogCache, CatalogPage};
pub use cse_api::{
    backend::CatalogBackend,
    bootstrap::{BootstrapReport, CatalogBootstrap},
    cart_api::CartApi,
    checkout_api::CheckoutApi,
    errors::CheckoutError,
    order_objects::{OrderReceipt, OrderSubmission},
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteStore, SqliteStoreError};
pub use db::traits::{CartStore, CatalogStore, ItemStore, StoreBackend};
pub use feed::{ConsumerStats, FeedConsumer, FeedEvent, FeedSource, MessageOutcome};
