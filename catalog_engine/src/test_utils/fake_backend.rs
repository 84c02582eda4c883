use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Arc,
};

use log::*;
use parking_lot::Mutex;
use thiserror::Error;

use crate::{
    cse_api::{backend::CatalogBackend, order_objects::OrderSubmission},
    db_types::{Item, OrderId},
};

#[derive(Debug, Clone, Error)]
#[error("Fake backend is unavailable")]
pub struct FakeBackendError;

#[derive(Default)]
struct FakeBackendState {
    items: Mutex<Vec<Item>>,
    submissions: Mutex<Vec<OrderSubmission>>,
    next_order_id: AtomicI64,
    fail_fetches: AtomicBool,
    fail_submissions: AtomicBool,
}

/// An in-memory [`CatalogBackend`]. Order ids are handed out sequentially, starting at `first_order_id`. Clones share
/// state, so a test can keep a handle to inspect submissions and flip failure modes.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<FakeBackendState>,
}

impl FakeBackend {
    pub fn new(first_order_id: i64) -> Self {
        let backend = Self::default();
        backend.set_next_order_id(first_order_id);
        backend
    }

    /// The id the next accepted order will get.
    pub fn set_next_order_id(&self, id: i64) {
        self.state.next_order_id.store(id, Ordering::SeqCst);
    }

    pub fn set_items(&self, items: Vec<Item>) {
        *self.state.items.lock() = items;
    }

    pub fn add_item(&self, item: Item) {
        self.state.items.lock().push(item);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.state.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_submissions(&self, fail: bool) {
        self.state.fail_submissions.store(fail, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<OrderSubmission> {
        self.state.submissions.lock().clone()
    }
}

impl CatalogBackend for FakeBackend {
    type Error = FakeBackendError;

    async fn fetch_items(&self) -> Result<Vec<Item>, Self::Error> {
        if self.state.fail_fetches.load(Ordering::SeqCst) {
            return Err(FakeBackendError);
        }
        Ok(self.state.items.lock().clone())
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderId, Self::Error> {
        if self.state.fail_submissions.load(Ordering::SeqCst) {
            return Err(FakeBackendError);
        }
        self.state.submissions.lock().push(order.clone());
        let id = self.state.next_order_id.fetch_add(1, Ordering::SeqCst);
        trace!("🌐️ Fake backend accepted order #{id}");
        Ok(OrderId(id))
    }
}
