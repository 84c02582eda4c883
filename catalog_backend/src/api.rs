use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{BackendApiError, BackendConfig, CatalogItem, NewOrderRequest, OrderCreated};

#[derive(Clone)]
pub struct BackendApi {
    config: BackendConfig,
    client: Arc<Client>,
}

impl BackendApi {
    pub fn new(config: BackendConfig) -> Result<Self, BackendApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| BackendApiError::Initialization(e.to_string()))?;
        headers.insert("X-API-Key", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, BackendApiError> {
        let url = self.url(path);
        trace!("🌐️ Sending {method} request: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| BackendApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🌐️ Request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| BackendApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| BackendApiError::RequestError(e.to_string()))?;
            Err(BackendApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetches the full item catalog.
    ///
    /// A single entry that does not have the expected shape (e.g. a negative price) fails the whole fetch with
    /// [`BackendApiError::JsonError`], so a partial catalog is never returned.
    pub async fn fetch_items(&self) -> Result<Vec<CatalogItem>, BackendApiError> {
        debug!("🌐️ Fetching item catalog");
        let raw = self.rest_query::<Vec<Value>, ()>(Method::GET, "/items/", None).await?;
        let items = parse_catalog_items(raw)?;
        info!("🌐️ Fetched {} items from the backend", items.len());
        Ok(items)
    }

    /// Submits an order and returns the backend-assigned order id.
    pub async fn submit_order(&self, order: &NewOrderRequest) -> Result<i64, BackendApiError> {
        debug!("🌐️ Submitting order for user #{} ({} items)", order.user_id, order.order_items.len());
        let created = self.rest_query::<OrderCreated, _>(Method::POST, "/order/", Some(order)).await?;
        let order_id = created.order_id.ok_or_else(|| {
            error!("🌐️ order_id not found in response to order submission for user #{}", order.user_id);
            BackendApiError::MissingOrderId
        })?;
        info!("🌐️ Order #{order_id} created for user #{}", order.user_id);
        Ok(order_id)
    }
}

fn parse_catalog_items(raw: Vec<Value>) -> Result<Vec<CatalogItem>, BackendApiError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value::<CatalogItem>(v.clone()).map_err(|e| {
                warn!("🌐️ Invalid catalog entry at position {i}: {v}. {e}");
                BackendApiError::JsonError(format!("Invalid catalog entry at position {i}: {e}"))
            })
        })
        .collect()
}
