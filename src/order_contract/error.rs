//! Error types for the Order contract.

use crate::framework::{ContractError, FrameworkError};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A stored order could not be embedded in a query result.
    #[error("Order {key} is not a JSON document: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// An error occurred while communicating with the order contract.
    #[error("Order contract communication error: {0}")]
    Communication(String),
}

impl OrderError {
    pub fn is_not_found(&self) -> bool {
        match self {
            OrderError::NotFound(_) => true,
            OrderError::Contract(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::Communication(msg)
    }
}

impl From<serde_json::Error> for OrderError {
    fn from(e: serde_json::Error) -> Self {
        OrderError::Contract(e.into())
    }
}

impl From<OrderError> for FrameworkError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Contract(e) => e.into(),
            OrderError::NotFound(order_no) => FrameworkError::NotFound(order_no),
            other => FrameworkError::Failure(other.to_string()),
        }
    }
}
