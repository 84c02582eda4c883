//! # Store backends
//!
//! This module defines the interface contracts that catalog store *backends* must satisfy.
//!
//! The store is a durable key-value substrate shared by the feed consumer and every request handler. It holds two
//! classes of record:
//!
//! * [`ItemStore`] keeps the latest known state of every catalog item, one record per item id.
//! * [`CartStore`] keeps, per user, the set of item ids in their cart. Cart entries are weak references; nothing
//!   checks that the item exists when it is added.
//!
//! Backends must make every individual method atomic. The engine never needs a transaction spanning more than one
//! call.
mod cart_store;
mod item_store;

pub use cart_store::CartStore;
pub use item_store::ItemStore;

/// Behaviour common to every store backend.
pub trait StoreBackend: Clone {
    type Error: std::error::Error + Send + Sync + 'static;
}

/// A store that can hold both the catalog and carts. Implemented for every type that implements both halves.
pub trait CatalogStore: ItemStore + CartStore {}

impl<T: ItemStore + CartStore> CatalogStore for T {}
