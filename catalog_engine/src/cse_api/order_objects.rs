use catalog_common::Price;
use serde::{Deserialize, Serialize};

use crate::{
    cse_api::errors::CheckoutError,
    db_types::{Customer, Item, OrderId, UserId},
};

/// An order, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub user_id: UserId,
    pub username: Option<String>,
    pub items: Vec<Item>,
    pub total_price: Price,
}

impl OrderSubmission {
    /// Builds an order for the customer. The total is always recomputed from the items' current prices.
    pub fn new(customer: &Customer, items: Vec<Item>) -> Result<Self, CheckoutError> {
        if customer.id.value() <= 0 {
            return Err(CheckoutError::Validation(format!("{} is not a valid user id", customer.id)));
        }
        if items.is_empty() {
            return Err(CheckoutError::Validation("An order must contain at least one item".to_string()));
        }
        let total_price = items
            .iter()
            .try_fold(Price::default(), |total, item| total.checked_add(item.price))
            .ok_or_else(|| CheckoutError::Validation("The order total is too large".to_string()))?;
        Ok(Self { user_id: customer.id, username: customer.username.clone(), items, total_price })
    }
}

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<Item>,
    pub total_price: Price,
}

impl OrderReceipt {
    pub fn new(order_id: OrderId, submission: OrderSubmission) -> Self {
        Self { order_id, user_id: submission.user_id, items: submission.items, total_price: submission.total_price }
    }
}
