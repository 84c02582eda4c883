use std::{fmt::Debug, sync::Arc};

use log::*;

use crate::{
    catalog::CatalogCache,
    db::traits::{CartStore, ItemStore},
    db_types::{Item, ItemId, UserId},
};

/// `CartApi` manages shopping carts.
///
/// A cart is a set of item ids stored per user. Nothing checks that an id refers to an existing item when it is
/// added, and deleting an item from the catalog does not touch any carts. Instead, [`Self::list`] resolves the ids
/// against the catalog cache and leaves out the ones that no longer exist.
pub struct CartApi<S> {
    store: S,
    cache: Arc<CatalogCache<S>>,
}

impl<S> Debug for CartApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<S: Clone> Clone for CartApi<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), cache: Arc::clone(&self.cache) }
    }
}

impl<S> CartApi<S> {
    pub fn new(store: S, cache: Arc<CatalogCache<S>>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &CatalogCache<S> {
        self.cache.as_ref()
    }
}

impl<S> CartApi<S>
where S: CartStore + ItemStore
{
    /// Adds the item to the user's cart. Returns `false` if it was already there, in which case nothing changes.
    pub async fn add(&self, user: UserId, item: ItemId) -> Result<bool, S::Error> {
        let added = self.store.add_to_cart(user, item).await?;
        if added {
            debug!("🛒️ Item #{item} added to cart for user {user}");
        } else {
            debug!("🛒️ Item #{item} is already in the cart for user {user}");
        }
        Ok(added)
    }

    /// Removes the item from the user's cart. Removing an item that is not in the cart is not an error.
    pub async fn remove(&self, user: UserId, item: ItemId) -> Result<bool, S::Error> {
        let removed = self.store.remove_from_cart(user, item).await?;
        debug!("🛒️ Remove item #{item} from cart for user {user}. Was in cart: {removed}");
        Ok(removed)
    }

    pub async fn contains(&self, user: UserId, item: ItemId) -> Result<bool, S::Error> {
        self.store.is_in_cart(user, item).await
    }

    /// The items in the user's cart, ordered by item id, with their current catalog details.
    pub async fn list(&self, user: UserId) -> Result<Vec<Item>, S::Error> {
        let ids = self.store.cart_item_ids(user).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = self.cache.get_many(&ids).await?;
        if items.len() < ids.len() {
            debug!(
                "🛒️ {} items in the cart for user {user} are no longer in the catalog and have been left out",
                ids.len() - items.len()
            );
        }
        Ok(items)
    }

    /// The raw item ids in the user's cart, including ids that no longer resolve.
    pub async fn item_ids(&self, user: UserId) -> Result<Vec<ItemId>, S::Error> {
        self.store.cart_item_ids(user).await
    }

    /// Empties the user's cart. Returns the number of entries removed.
    pub async fn clear(&self, user: UserId) -> Result<u64, S::Error> {
        let n = self.store.clear_cart(user).await?;
        debug!("🛒️ Cart for user {user} cleared. {n} entries removed");
        Ok(n)
    }
}
