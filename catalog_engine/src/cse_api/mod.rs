//! # Catalog engine public API
//!
//! The `cse_api` module exposes the programmatic API for the catalog engine.
//!
//! * [`cart_api`] manages per-user carts. Carts hold item ids only; they are resolved against the catalog cache when
//!   listed.
//! * [`checkout_api`] turns a cart into an order on the backend, and clears the cart once the backend has accepted it.
//! * [`bootstrap`] seeds the store from the backend at process start.
//! * [`backend`] defines the [`CatalogBackend`](backend::CatalogBackend) trait, the engine's view of the authoritative
//!   backend.
//!
//! # API usage
//!
//! Every API is created from a store backend plus whatever other collaborators it needs. The catalog cache is shared,
//! so it is passed around in an `Arc`:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog_engine::{CartApi, CatalogCache, SqliteStore};
//! let store = SqliteStore::new_with_url("sqlite://data/catalog_store.db", 5).await?;
//! let cache = Arc::new(CatalogCache::new(store.clone()));
//! let carts = CartApi::new(store, cache);
//! carts.add(UserId(7), ItemId(1)).await?;
//! let items = carts.list(UserId(7)).await?;
//! ```
pub mod backend;
pub mod bootstrap;
pub mod cart_api;
pub mod checkout_api;
pub mod errors;
pub mod order_objects;
