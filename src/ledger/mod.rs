//! Ledger access: the stub a contract runs against, an in-memory ledger that
//! implements it, and the typed record store built on top.

pub mod memory;
pub mod store;
pub mod stub;

pub use memory::{IteratorTracker, MemoryLedger, TxContext};
pub use store::RecordStore;
pub use stub::{ChaincodeStub, KeyValue, QueryMetadata, StateQueryIterator, StoreError};
