//! # Contract Host
//!
//! This module defines the generic building blocks for hosting a contract.
//!
//! ## Key Types
//!
//! - [`Contract`]: The trait every record domain implements.
//! - [`ContractHost`]: Owns a domain's ledger and runs invocations one at a time.
//! - [`ContractClient`]: Cloneable handle for invoking a hosted contract.

use crate::framework::error::FrameworkError;
use crate::ledger::{ChaincodeStub, MemoryLedger};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A record domain: a named set of operations dispatched by function name.
///
/// # Context
/// `Context` carries the dependencies the contract needs at run time (for the
/// goods domain, the route to the order domain). It is handed to
/// [`ContractHost::run`] rather than to the constructor, so hosts can be wired
/// together after all of them exist.
///
/// # Atomicity
/// An invocation sees the ledger through `stub`. Writes it buffers are committed
/// only if `invoke` returns `Ok`; on `Err` nothing is persisted.
#[async_trait]
pub trait Contract: Send + Sync + 'static {
    type Context: Send + Sync;

    type Error: std::error::Error + Into<FrameworkError> + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        ctx: &Self::Context,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, Self::Error>;
}

// =============================================================================
// 2. MESSAGES
// =============================================================================

/// Type alias for the one-shot response channel used by hosts.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A single call into a hosted contract.
#[derive(Debug)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
    pub respond_to: Response<Vec<u8>>,
}

// =============================================================================
// 3. THE HOST
// =============================================================================

/// Runs a [`Contract`] against its own ledger.
///
/// The host owns the ledger and processes invocations sequentially, so
/// invocations touching the same keys never interleave.
pub struct ContractHost<C: Contract> {
    receiver: mpsc::Receiver<Invocation>,
    ledger: MemoryLedger,
    contract: C,
    next_tx: u64,
}

impl<C: Contract> ContractHost<C> {
    pub fn new(contract: C, buffer_size: usize) -> (Self, ContractClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let host = Self {
            receiver,
            ledger: MemoryLedger::new(),
            contract,
            next_tx: 1,
        };
        (host, ContractClient::new(sender))
    }

    /// Replaces the (empty) starting ledger.
    pub fn with_ledger(mut self, ledger: MemoryLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Processes invocations until every client is dropped, then hands back
    /// the ledger.
    pub async fn run(mut self, context: C::Context) -> MemoryLedger {
        let contract = self.contract.name().to_string();
        info!(%contract, records = self.ledger.len(), "Contract started");

        while let Some(Invocation { function, args, respond_to }) = self.receiver.recv().await {
            let tx_id = format!("{contract}-{:06}", self.next_tx);
            self.next_tx += 1;
            debug!(%contract, %function, %tx_id, args = args.len(), "Invoke");

            let mut tx = self.ledger.begin(tx_id.clone());
            let result = self.contract.invoke(&mut tx, &context, &function, &args).await;
            match result {
                Ok(payload) => {
                    let writes = tx.into_writes();
                    let written = self.ledger.commit(writes);
                    info!(%contract, %function, %tx_id, written, "Committed");
                    let _ = respond_to.send(Ok(payload));
                }
                Err(e) => {
                    drop(tx);
                    warn!(%contract, %function, %tx_id, error = %e, "Invocation failed");
                    let _ = respond_to.send(Err(e.into()));
                }
            }
        }

        info!(%contract, records = self.ledger.len(), "Shutdown");
        self.ledger
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// Handle for invoking a hosted contract.
#[derive(Clone, Debug)]
pub struct ContractClient {
    sender: mpsc::Sender<Invocation>,
}

impl ContractClient {
    pub fn new(sender: mpsc::Sender<Invocation>) -> Self {
        Self { sender }
    }

    pub async fn invoke<I, S>(&self, function: &str, args: I) -> Result<Vec<u8>, FrameworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (respond_to, response) = oneshot::channel();
        let invocation = Invocation {
            function: function.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            respond_to,
        };
        self.sender
            .send(invocation)
            .await
            .map_err(|_| FrameworkError::ContractClosed)?;
        response.await.map_err(|_| FrameworkError::ContractDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::error::{expect_args, ContractError};

    /// Counter contract: `incr(key)` bumps a number, `fail(key)` writes then fails.
    struct Counter;

    #[async_trait]
    impl Contract for Counter {
        type Context = ();
        type Error = ContractError;

        fn name(&self) -> &str {
            "counter"
        }

        async fn invoke(
            &self,
            stub: &mut dyn ChaincodeStub,
            _ctx: &(),
            function: &str,
            args: &[String],
        ) -> Result<Vec<u8>, ContractError> {
            let [key] = expect_args::<1>(args)?;
            let current = match stub.get_state(key)? {
                Some(bytes) => String::from_utf8_lossy(&bytes).parse::<u64>().unwrap_or(0),
                None => 0,
            };
            let next = (current + 1).to_string();
            stub.put_state(key, next.clone().into_bytes())?;
            match function {
                "incr" => Ok(next.into_bytes()),
                "fail" => Err(ContractError::Validation("refused".into())),
                other => Err(ContractError::UnsupportedMethod(other.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_commit_on_success_discard_on_failure() {
        let (host, client) = ContractHost::new(Counter, 10);
        let handle = tokio::spawn(host.run(()));

        assert_eq!(client.invoke("incr", ["k"]).await.unwrap(), b"1");
        assert_eq!(client.invoke("incr", ["k"]).await.unwrap(), b"2");

        let err = client.invoke("fail", ["k"]).await.unwrap_err();
        assert_eq!(err, FrameworkError::Failure("validation failed: refused".into()));

        assert_eq!(client.invoke("incr", ["k"]).await.unwrap(), b"3");

        let err = client.invoke("incr", Vec::<String>::new()).await.unwrap_err();
        assert_eq!(err, FrameworkError::Failure("args length should be 1, got 0".into()));

        drop(client);
        let ledger = handle.await.unwrap();
        assert_eq!(ledger.get("k"), Some(&b"3"[..]));
    }

    #[tokio::test]
    async fn test_closed_host_is_reported() {
        let (host, client) = ContractHost::new(Counter, 1);
        drop(host);
        assert_eq!(
            client.invoke("incr", ["k"]).await.unwrap_err(),
            FrameworkError::ContractClosed
        );
    }
}
