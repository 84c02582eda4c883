//! Key layout of the store. Every entity class has its own prefix so that keys can never collide.
use crate::db_types::{ItemId, UserId};

pub const ITEM_PREFIX: &str = "item:";
pub const CART_PREFIX: &str = "cart:";

pub fn item_key(id: ItemId) -> String {
    format!("{ITEM_PREFIX}{id}")
}

pub fn cart_key(user: UserId) -> String {
    format!("{CART_PREFIX}{user}")
}
