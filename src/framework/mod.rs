//! Contract hosting.
//!
//! # Main Components
//!
//! - [`Contract`] - Trait each record domain implements
//! - [`ContractHost`] - Runs a contract against its ledger, one invocation at a time
//! - [`ContractClient`] - Handle for invoking a hosted contract
//! - [`ContractInvoker`] - Routes calls from one domain into another
//! - [`FrameworkError`] / [`ContractError`] - Common error types
//!
//! # Testing
//!
//! See the [`mock`] module for utilities to test callers without hosting a real contract.

pub mod core;
pub mod error;
pub mod invoker;
pub mod mock;

pub use core::{Contract, ContractClient, ContractHost, Invocation, Response};
pub use error::{expect_args, ContractError, FrameworkError};
pub use invoker::ContractInvoker;
