pub mod keys;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;
