use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Request could not be completed: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The backend accepted the order but did not return an order_id")]
    MissingOrderId,
}

impl BackendApiError {
    /// True if the backend could not be reached, or failed in a way that may succeed on a retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestError(_) => true,
            Self::QueryError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
