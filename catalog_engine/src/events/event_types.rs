use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cse_api::order_objects::OrderReceipt;

/// Emitted after the backend has accepted an order and the customer's cart has been cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub receipt: OrderReceipt,
    pub username: Option<String>,
    pub placed_at: DateTime<Utc>,
}

impl OrderPlacedEvent {
    pub fn new(receipt: OrderReceipt, username: Option<String>) -> Self {
        Self { receipt, username, placed_at: Utc::now() }
    }
}
