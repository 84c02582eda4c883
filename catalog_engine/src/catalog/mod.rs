//! In-memory catalog cache.
//!
//! [`CatalogCache`] mirrors every item in the store. It is *advisory*: it starts cold, fills itself from the store on
//! the first read (read-through), and is then kept current by the feed consumer via [`CatalogCache::upsert`] and
//! [`CatalogCache::remove`]. Share it between tasks with an `Arc`.
mod cache;

pub use cache::{CatalogCache, CatalogPage, DEFAULT_PAGE_SIZE};
