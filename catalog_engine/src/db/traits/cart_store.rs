use crate::{
    db::traits::StoreBackend,
    db_types::{ItemId, UserId},
};

/// Per-user cart membership. A cart is a set: adding an item twice has no further effect, and an empty set is the
/// same as no cart at all.
#[allow(async_fn_in_trait)]
pub trait CartStore: StoreBackend {
    /// Adds the item to the user's cart. Returns `true` if it was not already there.
    async fn add_to_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error>;

    /// Removes the item from the user's cart. Returns `false` if it was not in the cart.
    async fn remove_from_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error>;

    async fn is_in_cart(&self, user: UserId, item: ItemId) -> Result<bool, Self::Error>;

    /// The raw item ids in the user's cart, in ascending order. Ids are not checked against the catalog.
    async fn cart_item_ids(&self, user: UserId) -> Result<Vec<ItemId>, Self::Error>;

    /// Empties the user's cart. Returns the number of entries removed.
    async fn clear_cart(&self, user: UserId) -> Result<u64, Self::Error>;
}
