use catalog_engine::{
    db_types::{Item, OrderId},
    CatalogBackend,
    OrderSubmission,
};
use mockall::mock;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MockBackendError {
    #[error("Connection refused")]
    Unavailable,
    #[error("Backend returned 400: {0}")]
    Rejected(String),
}

mock! {
    pub Backend {}
    impl CatalogBackend for Backend {
        type Error = MockBackendError;
        async fn fetch_items(&self) -> Result<Vec<Item>, MockBackendError>;
        async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderId, MockBackendError>;
    }
}
