//! Client for the catalog backend: the HTTP service that owns the authoritative item catalog and order records.
//!
//! Only two calls are consumed: listing every item (`GET /items/`) and submitting an order (`POST /order/`). Both
//! authenticate with an `X-API-Key` header.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::BackendApi;
pub use config::BackendConfig;
pub use data_objects::{CatalogItem, NewOrderRequest, OrderCreated, OrderLine};
pub use error::BackendApiError;
