use catalog_backend::{BackendApi, BackendApiError, BackendConfig, CatalogItem, NewOrderRequest, OrderLine};
use catalog_engine::{
    db_types::{Item, ItemId, OrderId},
    CatalogBackend,
    OrderSubmission,
};
use log::*;

/// The engine's [`CatalogBackend`], talking to the real backend over HTTP.
#[derive(Clone)]
pub struct HttpCatalogBackend {
    api: BackendApi,
}

impl HttpCatalogBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendApiError> {
        let api = BackendApi::new(config)?;
        Ok(Self { api })
    }
}

impl CatalogBackend for HttpCatalogBackend {
    type Error = BackendApiError;

    async fn fetch_items(&self) -> Result<Vec<Item>, Self::Error> {
        let items = self.api.fetch_items().await?;
        trace!("🌐️ Backend returned {} items", items.len());
        Ok(items.into_iter().map(item_from_catalog_item).collect())
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderId, Self::Error> {
        let request = new_order_request(order);
        let id = self.api.submit_order(&request).await.map_err(|e| {
            if e.is_transient() {
                warn!("🌐️ The backend is unavailable. {e}");
            } else {
                error!("🌐️ The backend rejected the order for user {}. {e}", order.user_id);
            }
            e
        })?;
        Ok(OrderId(id))
    }
}

pub fn item_from_catalog_item(item: CatalogItem) -> Item {
    Item { id: ItemId(item.id), name: item.name, description: item.description, price: item.price }
}

pub fn new_order_request(order: &OrderSubmission) -> NewOrderRequest {
    let order_items = order
        .items
        .iter()
        .map(|i| OrderLine { id: i.id.value(), name: i.name.clone(), price: i.price })
        .collect();
    NewOrderRequest {
        user_id: order.user_id.value(),
        username: order.username.clone(),
        order_items,
        total_price: order.total_price,
    }
}
