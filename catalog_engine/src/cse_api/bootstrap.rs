use std::fmt::Display;

use log::*;

use crate::{cse_api::backend::CatalogBackend, db::traits::ItemStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapReport {
    /// The store was seeded with this many items.
    Seeded(usize),
    /// The store was left as it was.
    Skipped(String),
}

impl Display for BootstrapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seeded(n) => write!(f, "seeded with {n} items"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// Seeds the store with the backend's full catalog.
///
/// Run this once at start-up, before the feed consumer starts. Every backend item is upserted; items already in the
/// store that the backend no longer lists are left alone and are expected to be removed by a delete message. The
/// catalog cache is not touched, so it fills from the store on first read.
pub struct CatalogBootstrap<S, B> {
    store: S,
    backend: B,
}

impl<S, B> CatalogBootstrap<S, B>
where
    S: ItemStore,
    B: CatalogBackend,
{
    pub fn new(store: S, backend: B) -> Self {
        Self { store, backend }
    }

    /// Never fails. If the backend cannot be reached, the store keeps whatever it held before and the service starts
    /// with that.
    pub async fn run(&self) -> BootstrapReport {
        let items = match self.backend.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                warn!("🚀️ Could not fetch the catalog from the backend. Starting with the existing store. {e}");
                return BootstrapReport::Skipped(e.to_string());
            },
        };
        debug!("🚀️ Fetched {} items from the backend", items.len());
        match self.store.upsert_items(&items).await {
            Ok(n) => {
                info!("🚀️ Catalog store seeded with {n} items");
                BootstrapReport::Seeded(n)
            },
            Err(e) => {
                error!("🚀️ Could not seed the catalog store. {e}");
                BootstrapReport::Skipped(e.to_string())
            },
        }
    }
}
