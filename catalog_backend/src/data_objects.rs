use catalog_common::Price;
use serde::{Deserialize, Serialize};

/// An item as returned by `GET /items/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
}

/// A single entry in an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderLine {
    pub id: i64,
    pub name: String,
    pub price: Price,
}

/// The body of `POST /order/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewOrderRequest {
    pub user_id: i64,
    pub username: Option<String>,
    pub order_items: Vec<OrderLine>,
    pub total_price: Price,
}

/// The response to a successful `POST /order/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderCreated {
    #[serde(default)]
    pub order_id: Option<i64>,
}
