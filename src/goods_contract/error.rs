//! Error types for the Goods contract.

use crate::framework::{ContractError, FrameworkError};
use thiserror::Error;

/// Errors that can occur during goods operations.
#[derive(Debug, Error)]
pub enum GoodsError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The stock adjustment direction is not one of the accepted flags.
    #[error("updateType should be increase or decrease, get {0}")]
    InvalidDirection(String),

    /// A numeric-as-string value did not parse as an integer.
    #[error("{field} should be an integer, get {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    /// The adjusted stock count does not fit in an integer.
    #[error("stockNum overflow adjusting {stock_id}")]
    StockOverflow { stock_id: String },

    #[error("shopId or kindId required")]
    MissingShopOrKind,

    /// The requested goods were not found.
    #[error("Goods not found: {0}")]
    NotFound(String),

    /// An error occurred while communicating with the goods contract.
    #[error("Goods contract communication error: {0}")]
    Communication(String),
}

impl GoodsError {
    pub fn is_not_found(&self) -> bool {
        match self {
            GoodsError::NotFound(_) => true,
            GoodsError::Contract(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<String> for GoodsError {
    fn from(msg: String) -> Self {
        GoodsError::Communication(msg)
    }
}

impl From<serde_json::Error> for GoodsError {
    fn from(e: serde_json::Error) -> Self {
        GoodsError::Contract(e.into())
    }
}

impl From<GoodsError> for FrameworkError {
    fn from(e: GoodsError) -> Self {
        match e {
            GoodsError::Contract(e) => e.into(),
            GoodsError::NotFound(stock_id) => FrameworkError::NotFound(stock_id),
            other => FrameworkError::Failure(other.to_string()),
        }
    }
}
