use crate::framework::{ContractClient, FrameworkError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Trait for domain clients to inherit invocation plumbing.
///
/// Implementors supply the inner [`ContractClient`] and an error mapping; the
/// provided methods cover raw, text and JSON replies.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// The domain-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ContractClient.
    fn inner(&self) -> &ContractClient;

    /// Map framework errors to the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Invokes `function` and returns the raw reply.
    #[tracing::instrument(skip(self, args))]
    async fn call(&self, function: &str, args: Vec<String>) -> Result<Vec<u8>, Self::Error> {
        tracing::debug!(args = args.len(), "Sending request");
        self.inner().invoke(function, args).await.map_err(Self::map_error)
    }

    /// Invokes `function` and reads the reply as UTF-8 (tx ids, record keys).
    async fn call_text(&self, function: &str, args: Vec<String>) -> Result<String, Self::Error> {
        let bytes = self.call(function, args).await?;
        String::from_utf8(bytes).map_err(|e| Self::Error::from(e.to_string()))
    }

    /// Invokes `function` and decodes a JSON reply.
    async fn call_json<T>(&self, function: &str, args: Vec<String>) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        let bytes = self.call(function, args).await?;
        serde_json::from_slice(&bytes).map_err(|e| Self::Error::from(e.to_string()))
    }
}
