//! # Ledger Contracts
//!
//! > **Query, patch and cross-domain composition for ledgered business records.**
//!
//! Four record domains (assets, fund bills, trade goods and orders) each run as a contract
//! over their own slice of a key-value ledger. On top of plain get/put the
//! contracts offer rich queries with opaque pagination, sparse patches that touch
//! only the fields they name, and batch traces that stitch goods and orders from
//! two domains into one response.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Records are flat string documents
//! Every field on the wire is a string, numbers and timestamps included. Each
//! record type declares its fields once, in a table generated by
//! `ledger_record!`, and generic code (the patch merger, the store adapter) walks
//! that table instead of knowing every field by name.
//!
//! ### One invocation, one transaction
//! A contract host gives each invocation a fresh transaction context. Writes are
//! buffered and committed only if the whole operation succeeds, including any
//! call it made into another domain.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: `Contract` and `Record`
//! [`ContractHost<C>`](framework::ContractHost) runs any [`Contract`](framework::Contract):
//! the message loop, transaction handling and error mapping are written once.
//! [`RecordStore`](ledger::RecordStore) works for any [`Record`](model::Record).
//!
//! ### Mocking: Testing without Pain
//! A domain that calls another can be tested against a scripted endpoint.
//! See the [`framework::mock`] module.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each domain has its own error enum (`AssetError`, `FundError`, `GoodsError`, `OrderError`)
//! wrapping the shared [`ContractError`](framework::ContractError). A missing record
//! is always reported as not-found, never as a generic store failure, and stays
//! recognisable after crossing a channel as
//! [`FrameworkError::NotFound`](framework::FrameworkError::NotFound).
//!
//! ### 2. Configuration Injection
//! The name the goods domain uses to reach the order domain is part of its
//! configuration, fixed at construction. Routes are handed to the host's `run()`
//! as its context.
//!
//! ### 3. Concurrency Model
//! Each host runs in its own Tokio task and processes invocations sequentially,
//! so operations on overlapping keys never interleave. Query cursors never
//! outlive the invocation that opened them.
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Storage ([`ledger`], [`query`], [`model`])
//! - **Role**: the stub interface and an in-memory ledger, query documents and
//!   cursors, record types and the patch merger.
//! - **Key items**: [`ChaincodeStub`](ledger::ChaincodeStub), [`QueryBuilder`](query::QueryBuilder),
//!   [`QueryCursor`](query::QueryCursor), [`merge`](model::merge).
//!
//! ### 2. The Engine ([`framework`])
//! - **Role**: hosts contracts and routes calls between them.
//! - **Key items**: [`ContractHost`](framework::ContractHost), [`ContractInvoker`](framework::ContractInvoker).
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: spins up the four hosts, registers their indexes and wires goods to orders.
//! - **Key items**: [`LedgerNetwork`](lifecycle::LedgerNetwork), [`NetworkConfig`](lifecycle::NetworkConfig).
//!
//! ### 4. The Interface ([`clients`])
//! - **Role**: typed wrappers over the function-name/argument-list protocol.
//! - **Key items**: [`GoodsClient`](clients::GoodsClient), [`OrderClient`](clients::OrderClient).
//!
//! ### 5. The Domains ([`asset_contract`], [`fund_contract`], [`goods_contract`], [`order_contract`])
//! - **Role**: the operations each domain dispatches by function name.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod asset_contract;
pub mod clients;
pub mod framework;
pub mod fund_contract;
pub mod goods_contract;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod order_contract;
pub mod query;
