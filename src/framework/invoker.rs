//! # Cross-Contract Invoker
//!
//! Routes a call from one contract into another domain by name. The caller
//! awaits the reply inside its own invocation, so a downstream failure fails
//! the caller and nothing the caller buffered is committed.

use crate::framework::core::ContractClient;
use crate::framework::error::{ContractError, FrameworkError};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Name-to-client routing table, fixed once the network is wired.
#[derive(Clone, Debug, Default)]
pub struct ContractInvoker {
    routes: HashMap<String, ContractClient>,
}

impl ContractInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, client: ContractClient) -> Self {
        self.routes.insert(name.into(), client);
        self
    }

    /// Invokes `operation` on `target` with a single serialized argument.
    #[instrument(skip(self, argument))]
    pub async fn invoke(
        &self,
        target: &str,
        operation: &str,
        argument: &str,
    ) -> Result<Vec<u8>, ContractError> {
        let downstream = |source: FrameworkError| ContractError::Downstream {
            target: target.to_string(),
            operation: operation.to_string(),
            source,
        };

        let client = self
            .routes
            .get(target)
            .ok_or_else(|| downstream(FrameworkError::UnknownContract(target.to_string())))?;

        debug!(len = argument.len(), "Relaying");
        client.invoke(operation, [argument]).await.map_err(|e| {
            warn!(error = %e, "Downstream invocation failed");
            downstream(e)
        })
    }
}
