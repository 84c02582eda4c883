use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteStoreError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Could not serialize record: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Record at {key} is corrupt: {reason}")]
    CorruptRecord { key: String, reason: String },
}
