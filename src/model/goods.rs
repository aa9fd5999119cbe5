use super::record::ledger_record;
use serde::{Deserialize, Serialize};

ledger_record! {
    /// A stock entry of trade goods held by a market stall, keyed by `stockId`.
    pub struct Goods keyed by stock_id as "stockId" {
        batch_no => "batchNo",
        stock_id => "stockId",
        goods_name => "goodsName",
        goods_origin => "goodsOrigin",
        market_name => "marketName",
        goods_id => "goodsId",
        goods_pic => "goodsPic",
        kind_id => "kindId",
        kind_name => "kindName",
        weight => "weight",
        price => "price",
        /// Stall that owns the stock.
        shop_id => "shopId",
        /// Quantity listed for sale.
        amount => "amount",
        /// Quantity in stock, an integer encoded as a string.
        stock_num => "stockNum",
        /// `1` when self-produced.
        is_self => "isSelf",
        /// Purchase receipt.
        file_name => "fileName",
        desc => "desc",
        storage_time => "storageTime",
        submit_time => "submitTime",
        /// Listing state: `0` listed, `1` delisted.
        gsi_status => "gsiStatus",
        /// Quality check state.
        qc_status => "qcstatus",
    }
}

/// Projection of a goods record returned by the stall/category listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoodsSummary {
    pub kind_id: String,
    pub kind_name: String,
    pub amount: String,
    pub stock_num: String,
}

/// Arguments of the stall/category detail listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoodsDetailQuery {
    pub shop_id: String,
    pub kind_id: String,
    pub goods_id: String,
    pub gsi_status: String,
    pub gc_status: String,
    pub bookmark: String,
    pub page_size: i32,
}

/// Arguments of the listing over a set of befriended stalls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FriendGoodsQuery {
    pub shop_id_list: Vec<String>,
    /// Matched as a pattern against `kindName`.
    pub goods_name: String,
    pub bookmark: String,
    pub page_size: i32,
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increase,
    Decrease,
}

impl StockDirection {
    /// Parses a direction flag: `increase` or `decrease`, nothing else.
    pub fn parse(flag: &str) -> Option<Self> {
        match flag {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }

    pub fn as_flag(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    pub fn apply(self, current: i64, delta: i64) -> Option<i64> {
        match self {
            Self::Increase => current.checked_add(delta),
            Self::Decrease => current.checked_sub(delta),
        }
    }
}
