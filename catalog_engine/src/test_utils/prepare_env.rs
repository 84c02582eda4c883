use catalog_common::Price;
use log::*;

use crate::{db_types::Item, SqliteStore};

/// Initialises logging and returns a freshly migrated, private in-memory store.
pub async fn prepare_test_env() -> SqliteStore {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let store = SqliteStore::new_in_memory().await.expect("Error creating in-memory database");
    store.migrate().await.expect("Error running DB migrations");
    debug!("🚀️ Test store ready");
    store
}

/// A catalog item priced in whole cents.
pub fn test_item(id: i64, name: &str, cents: i64) -> Item {
    Item::new(id, name, Price::from_cents(cents).expect("Invalid test price"))
}
