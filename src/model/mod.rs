//! Ledger record types and the patch merger.
//!
//! Each record is a flat document of string fields declared once through a
//! field table, see [`Record`].

mod record;

pub mod asset;
pub mod fund;
pub mod goods;
pub mod order;
pub mod patch;

pub use asset::Asset;
pub use fund::FundBill;
pub use goods::{FriendGoodsQuery, Goods, GoodsDetailQuery, GoodsSummary, StockDirection};
pub use order::Order;
pub use patch::{apply, merge, PatchDocument};
pub use record::{Field, Record};
