//! # Mock Contracts
//!
//! Utilities for testing a contract's callers without hosting the real thing.
//!
//! Use [`MockContract`] for scripted replies, or [`create_mock_client`] together
//! with [`expect_invocation`] to inspect each call and answer it by hand.

use crate::framework::core::{ContractClient, Invocation, Response};
use crate::framework::error::FrameworkError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    function: String,
    response: Result<Vec<u8>, FrameworkError>,
}

/// A scripted contract endpoint.
///
/// # Example
/// ```ignore
/// let mut mock = MockContract::new();
/// mock.expect_invoke("queryOrder").return_ok(br#"[{"orderNo":"O1"}]"#.to_vec());
///
/// let invoker = ContractInvoker::new().register("order", mock.client());
/// // exercise the caller...
/// mock.verify(); // Ensures all expectations were met
/// ```
///
/// Invocations are matched in order. A call for a different function than the
/// next expectation, or one with no expectation left, panics the mock task and
/// the caller sees [`FrameworkError::ContractDropped`].
pub struct MockContract {
    client: ContractClient,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    received: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockContract {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Invocation>(100);
        let expectations: Arc<Mutex<VecDeque<Expectation>>> = Arc::default();
        let received: Arc<Mutex<Vec<(String, Vec<String>)>>> = Arc::default();
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        let handle = tokio::spawn(async move {
            while let Some(Invocation { function, args, respond_to }) = receiver.recv().await {
                let next = expectations_clone.lock().unwrap().pop_front();
                received_clone.lock().unwrap().push((function.clone(), args));
                match next {
                    Some(expectation) if expectation.function == function => {
                        let _ = respond_to.send(expectation.response);
                    }
                    Some(expectation) => panic!(
                        "Unexpected invocation {function}, expected {}",
                        expectation.function
                    ),
                    None => panic!("Unexpected invocation {function}, no expectations left"),
                }
            }
        });

        Self {
            client: ContractClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ContractClient {
        self.client.clone()
    }

    /// Expects an invocation of `function`.
    pub fn expect_invoke(&mut self, function: &str) -> InvokeExpectationBuilder {
        InvokeExpectationBuilder {
            function: function.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every invocation received so far, as `(function, args)`.
    pub fn received(&self) -> Vec<(String, Vec<String>)> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap();
        if !remaining.is_empty() {
            panic!("Not all expectations were met. {} remaining", remaining.len());
        }
    }
}

impl Default for MockContract {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for invocation expectations.
pub struct InvokeExpectationBuilder {
    function: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl InvokeExpectationBuilder {
    pub fn return_ok(self, payload: impl Into<Vec<u8>>) {
        self.push(Ok(payload.into()));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<u8>, FrameworkError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            function: self.function,
            response,
        });
    }
}

// =============================================================================
// LOW LEVEL HELPERS
// =============================================================================

/// Creates a client whose invocations arrive on the returned receiver.
///
/// Nothing answers them until the test does, which makes it possible to assert
/// on the exact arguments a caller sends and to hold a reply back.
pub fn create_mock_client(buffer_size: usize) -> (ContractClient, mpsc::Receiver<Invocation>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ContractClient::new(sender), receiver)
}

/// Waits for the next invocation and splits it into its parts.
pub async fn expect_invocation(
    receiver: &mut mpsc::Receiver<Invocation>,
) -> Option<(String, Vec<String>, Response<Vec<u8>>)> {
    receiver
        .recv()
        .await
        .map(|Invocation { function, args, respond_to }| (function, args, respond_to))
}
