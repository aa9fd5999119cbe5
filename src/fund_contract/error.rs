//! Error types for the Fund contract.

use crate::framework::{ContractError, FrameworkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Fund bill not found: {0}")]
    NotFound(String),

    #[error("Fund contract communication error: {0}")]
    Communication(String),
}

impl FundError {
    pub fn is_not_found(&self) -> bool {
        match self {
            FundError::NotFound(_) => true,
            FundError::Contract(e) => e.is_not_found(),
            FundError::Communication(_) => false,
        }
    }
}

impl From<String> for FundError {
    fn from(msg: String) -> Self {
        FundError::Communication(msg)
    }
}

impl From<serde_json::Error> for FundError {
    fn from(e: serde_json::Error) -> Self {
        FundError::Contract(e.into())
    }
}

impl From<FundError> for FrameworkError {
    fn from(e: FundError) -> Self {
        match e {
            FundError::Contract(e) => e.into(),
            FundError::NotFound(id) => FrameworkError::NotFound(id),
            other => FrameworkError::Failure(other.to_string()),
        }
    }
}
