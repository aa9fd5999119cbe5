//! Error types for the Asset contract.

use crate::framework::{ContractError, FrameworkError};
use thiserror::Error;

/// Errors that can occur during asset operations.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// An error occurred while communicating with the asset contract.
    #[error("Asset contract communication error: {0}")]
    Communication(String),
}

impl AssetError {
    pub fn is_not_found(&self) -> bool {
        match self {
            AssetError::NotFound(_) => true,
            AssetError::Contract(e) => e.is_not_found(),
            AssetError::Communication(_) => false,
        }
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Communication(msg)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Contract(e.into())
    }
}

impl From<AssetError> for FrameworkError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::Contract(e) => e.into(),
            AssetError::NotFound(id) => FrameworkError::NotFound(id),
            other => FrameworkError::Failure(other.to_string()),
        }
    }
}
