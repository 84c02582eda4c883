use crate::{
    db::traits::StoreBackend,
    db_types::{Item, ItemId},
};

/// Storage for the latest-known state of each catalog item.
#[allow(async_fn_in_trait)]
pub trait ItemStore: StoreBackend {
    /// Inserts the item, or overwrites the stored record with the same id.
    async fn upsert_item(&self, item: &Item) -> Result<(), Self::Error>;

    /// Upserts a batch of items in one go. Returns the number of items written.
    async fn upsert_items(&self, items: &[Item]) -> Result<usize, Self::Error>;

    /// Deletes the item record. Returns `false` if there was nothing to delete, which is not an error.
    async fn delete_item(&self, id: ItemId) -> Result<bool, Self::Error>;

    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>, Self::Error>;

    /// Returns every stored item, ordered by id.
    async fn fetch_all_items(&self) -> Result<Vec<Item>, Self::Error>;
}
