use crate::{
    cse_api::order_objects::OrderSubmission,
    db_types::{Item, OrderId},
};

/// The authoritative catalog and order backend.
///
/// The engine only ever reads the full item list (at bootstrap) and creates orders. Implementations decide how
/// errors are classified; the engine treats every error as "the backend is unavailable" and leaves local state
/// unchanged.
#[allow(async_fn_in_trait)]
pub trait CatalogBackend {
    type Error: std::error::Error;

    /// Fetches every item in the catalog.
    async fn fetch_items(&self) -> Result<Vec<Item>, Self::Error>;

    /// Creates an order and returns the id the backend assigned to it. An `Ok` result means the order has been
    /// persisted upstream.
    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderId, Self::Error>;
}
