use thiserror::Error;

use crate::db_types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("The cart for user {0} is empty")]
    EmptyCart(UserId),
    #[error("Invalid order: {0}")]
    Validation(String),
    #[error("The backend did not accept the order: {0}")]
    SubmissionFailed(String),
    #[error("Store error: {0}")]
    StoreError(String),
}

impl CheckoutError {
    /// Whether trying the same checkout again later could succeed. None of these failures change the cart.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SubmissionFailed(_) | Self::StoreError(_))
    }
}
