//! Network lifecycle: configuration, wiring and tracing setup.

pub mod config;
pub mod network;
pub mod tracing;

pub use config::{ConfigError, NetworkConfig};
pub use network::LedgerNetwork;
pub use self::tracing::setup_tracing;
