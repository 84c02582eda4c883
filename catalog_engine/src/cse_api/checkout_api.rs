use std::fmt::Debug;

use log::*;

use crate::{
    cse_api::{
        backend::CatalogBackend,
        cart_api::CartApi,
        errors::CheckoutError,
        order_objects::{OrderReceipt, OrderSubmission},
    },
    db::traits::{CartStore, ItemStore},
    db_types::Customer,
    events::{EventProducers, OrderPlacedEvent},
};

/// `CheckoutApi` turns a user's cart into an order on the backend.
///
/// The cart is only cleared once the backend has confirmed that the order exists. Any failure before that point
/// leaves the cart exactly as it was, so the user can simply try again.
///
/// Two concurrent checkouts for the same user are not serialised. Both may read the same cart and submit it, which
/// results in two orders upstream.
pub struct CheckoutApi<S, B> {
    carts: CartApi<S>,
    backend: B,
    producers: EventProducers,
}

impl<S, B> Debug for CheckoutApi<S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<S, B> CheckoutApi<S, B> {
    pub fn new(carts: CartApi<S>, backend: B, producers: EventProducers) -> Self {
        Self { carts, backend, producers }
    }
}

impl<S, B> CheckoutApi<S, B>
where
    S: CartStore + ItemStore,
    B: CatalogBackend,
{
    /// Submits the contents of the customer's cart as a new order.
    ///
    /// The order total is recomputed from the current catalog prices. Items in the cart that are no longer in the
    /// catalog are not ordered. An empty cart (including one where nothing resolves) fails with
    /// [`CheckoutError::EmptyCart`] and has no side effects.
    pub async fn checkout(&self, customer: &Customer) -> Result<OrderReceipt, CheckoutError> {
        let user = customer.id;
        let items = self.carts.list(user).await.map_err(|e| {
            error!("📦️ Could not read the cart for user {user}. {e}");
            CheckoutError::StoreError(e.to_string())
        })?;
        if items.is_empty() {
            info!("📦️ Checkout requested for user {user}, but their cart is empty");
            return Err(CheckoutError::EmptyCart(user));
        }
        let submission = OrderSubmission::new(customer, items)?;
        debug!(
            "📦️ Submitting order for user {user}: {} items, total {}",
            submission.items.len(),
            submission.total_price
        );
        let order_id = self.backend.submit_order(&submission).await.map_err(|e| {
            warn!("📦️ The backend did not accept the order for user {user}. The cart has been kept. {e}");
            CheckoutError::SubmissionFailed(e.to_string())
        })?;
        info!("📦️ Order #{order_id} placed for user {user}. Total: {}", submission.total_price);
        // The order exists upstream now. Failing to clear the cart must not turn this into a failed checkout.
        if let Err(e) = self.carts.clear(user).await {
            error!("📦️ Order #{order_id} was placed, but the cart for user {user} could not be cleared. {e}");
        }
        let receipt = OrderReceipt::new(order_id, submission);
        self.call_order_placed_hook(&receipt, customer).await;
        Ok(receipt)
    }

    async fn call_order_placed_hook(&self, receipt: &OrderReceipt, customer: &Customer) {
        for emitter in &self.producers.order_placed_producer {
            debug!("📦️ Notifying order placed hook subscribers");
            let event = OrderPlacedEvent::new(receipt.clone(), customer.username.clone());
            emitter.publish_event(event).await;
        }
    }
}
