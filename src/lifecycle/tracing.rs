//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber: structured `tracing` events,
//! filtered by `RUST_LOG`, in a compact format without module targets.
//!
//! ## What Gets Traced
//!
//! - **Host Lifecycle**: start, shutdown and final record count per contract
//! - **Invocations**: function and tx id at `debug`, commits at `info`, failures at `warn`
//! - **Queries**: the generated query document and page metadata at `debug`
//! - **Cross-domain calls**: relays and downstream failures, inside the caller's span
//!
//! ## Usage Examples
//!
//! ```bash
//! # Commits and failures only
//! RUST_LOG=info cargo run
//!
//! # Query documents, bookmarks and ignored patch keys
//! RUST_LOG=debug cargo run
//!
//! # One layer at a time
//! RUST_LOG=ledger_contracts::query=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a stock adjustment followed by a batch trace reads:
//!
//! ```text
//! INFO Stock adjusted stock_id="S1" direction=Increase current=10 next=13
//! INFO Committed contract=goods function=updateGoodsAmount tx_id=goods-000002 written=1
//! INFO Committed contract=order function=queryOrder tx_id=order-000002 written=0
//! INFO Committed contract=goods function=traceGoodsAndOrderByBatchNo tx_id=goods-000003 written=0
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // contract names are carried as fields
        .compact()
        .init();
}
