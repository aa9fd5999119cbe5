//! Error types shared by every contract.
//!
//! [`FrameworkError`] is what crosses a channel: it is the failure a caller of a
//! contract sees. [`ContractError`] carries the failure kinds common to all
//! record domains and is wrapped by each domain's own error enum.

use crate::ledger::StoreError;
use thiserror::Error;

/// Errors that can occur while talking to a contract host.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Contract closed")]
    ContractClosed,
    #[error("Contract dropped response channel")]
    ContractDropped,
    #[error("No contract registered as {0}")]
    UnknownContract(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Failure(String),
}

/// Failure kinds every record contract can raise.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("args length should be {expected}, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    /// The key is absent from the ledger. Kept apart from [`ContractError::Store`].
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// The payload's own key field disagrees with the key it is stored under.
    #[error("{field} mismatch: expected {expected}, got {found}")]
    KeyMismatch {
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{operation} on {target} failed: {source}")]
    Downstream {
        target: String,
        operation: String,
        #[source]
        source: FrameworkError,
    },

    #[error("unsupported method {0}")]
    UnsupportedMethod(String),
}

impl ContractError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::NotFound { .. })
    }
}

impl From<ContractError> for FrameworkError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::NotFound { key, .. } => FrameworkError::NotFound(key),
            other => FrameworkError::Failure(other.to_string()),
        }
    }
}

/// Checks an argument list has exactly `N` entries.
pub fn expect_args<const N: usize>(args: &[String]) -> Result<&[String; N], ContractError> {
    args.try_into().map_err(|_| ContractError::ArgumentCount {
        expected: N,
        actual: args.len(),
    })
}
