//! Type-safe wrappers around [`ContractClient`](crate::framework::ContractClient).

pub mod asset_client;
pub mod fund_client;
pub mod goods_client;
pub mod order_client;
pub mod record_client;

pub use asset_client::*;
pub use fund_client::*;
pub use goods_client::*;
pub use order_client::*;
pub use record_client::*;
