use std::fmt::Display;

use catalog_common::Price;
use catalog_engine::db_types::{Item, ItemId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Query parameters for `GET /items`. Pages are numbered from zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub user_id: UserId,
    pub items: Vec<Item>,
    pub total_price: Price,
}

impl CartView {
    /// The total saturates rather than overflowing. Checkout rejects such carts.
    pub fn new(user_id: UserId, items: Vec<Item>) -> Self {
        let total_price = items.iter().map(|i| i.price).sum();
        Self { user_id, items, total_price }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Whether the cart actually changed.
    pub changed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutParams {
    #[serde(default)]
    pub username: Option<String>,
}
