//! Goods contract: stock entries keyed by `stockId`.
//!
//! Besides plain record operations it serves the paged stall listings, stock
//! adjustments, and batch traces that pull the batch's orders from the order
//! domain. `addOrder`/`updateOrder` are relayed to the order domain unchanged.

pub mod error;
pub mod trace;

pub use error::*;
pub use trace::BatchTrace;

use crate::clients::GoodsClient;
use crate::framework::{expect_args, Contract, ContractError, ContractHost, ContractInvoker};
use crate::ledger::{ChaincodeStub, RecordStore};
use crate::model::{
    FriendGoodsQuery, Goods, GoodsDetailQuery, GoodsSummary, PatchDocument, StockDirection,
};
use crate::query::{raw_document, IndexHint, QueryBuilder, SortDirection};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use trace::TraceEnvelope;
use tracing::{debug, info, instrument};

/// Creates the Goods contract host and its client.
pub fn new(config: GoodsConfig, buffer_size: usize) -> (ContractHost<GoodsContract>, GoodsClient) {
    let (host, client) = ContractHost::new(GoodsContract::new(config), buffer_size);
    (host, GoodsClient::new(client))
}

/// Deployment settings of the goods domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoodsConfig {
    /// Name the order domain is registered under.
    pub order_contract: String,
}

impl Default for GoodsConfig {
    fn default() -> Self {
        Self {
            order_contract: "order".to_string(),
        }
    }
}

impl GoodsConfig {
    /// Reads instantiation arguments; the first one, if any, names the order domain.
    pub fn from_init_args(args: &[String]) -> Self {
        match args.first() {
            Some(name) if !name.is_empty() => Self {
                order_contract: name.clone(),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoodsContract {
    config: GoodsConfig,
}

impl GoodsContract {
    pub fn new(config: GoodsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GoodsConfig {
        &self.config
    }

    fn add_goods(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [json] = expect_args::<1>(args)?;
        let goods: Goods = store.insert_raw(json)?;
        info!(stock_id = %goods.stock_id, shop_id = %goods.shop_id, "Goods added");
        Ok(tx_receipt(store))
    }

    fn query_goods_by_stock_id(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id] = expect_args::<1>(args)?;
        Ok(store.get_raw::<Goods>(stock_id)?)
    }

    fn replace_goods(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id, json] = expect_args::<2>(args)?;
        store.replace_raw::<Goods>(stock_id, json)?;
        Ok(tx_receipt(store))
    }

    fn patch_goods(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id, json] = expect_args::<2>(args)?;
        let patch = PatchDocument::parse(json)?;
        store.patch::<Goods>(stock_id, &patch)?;
        Ok(tx_receipt(store))
    }

    fn update_good_status(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id, gsi_status] = expect_args::<2>(args)?;
        let mut goods: Goods = store.get(stock_id)?;
        debug!(%stock_id, from = %goods.gsi_status, to = %gsi_status, "Listing state");
        goods.gsi_status = gsi_status.clone();
        store.put(stock_id, &goods)?;
        Ok(tx_receipt(store))
    }

    /// Sets whichever of `fileName`/`price` is non-empty.
    fn update_file_name_or_price(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id, file_name, price] = expect_args::<3>(args)?;
        if stock_id.is_empty() {
            return Err(ContractError::MissingField("stockId").into());
        }
        let mut goods: Goods = store.get(stock_id)?;
        if !file_name.is_empty() {
            goods.file_name = file_name.clone();
        }
        if !price.is_empty() {
            goods.price = price.clone();
        }
        store.put(stock_id, &goods)?;
        Ok(tx_receipt(store))
    }

    fn update_goods_amount(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [stock_id, amount, direction] = expect_args::<3>(args)?;
        for (field, value) in [("stockId", stock_id), ("amount", amount), ("updateType", direction)] {
            if value.is_empty() {
                return Err(ContractError::MissingField(field).into());
            }
        }
        let direction = StockDirection::parse(direction)
            .ok_or_else(|| GoodsError::InvalidDirection(direction.clone()))?;
        let delta = parse_integer("amount", amount)?;

        let mut goods: Goods = store.get(stock_id)?;
        let current = parse_integer("stockNum", &goods.stock_num)?;
        let next = direction
            .apply(current, delta)
            .ok_or_else(|| GoodsError::StockOverflow { stock_id: stock_id.clone() })?;
        info!(%stock_id, ?direction, current, next, "Stock adjusted");

        goods.stock_num = next.to_string();
        store.put(stock_id, &goods)?;
        Ok(tx_receipt(store))
    }

    fn query_by_shop_and_kind_name(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [shop_id, kind_name, bookmark, page_size] = expect_args::<4>(args)?;
        let page_size = parse_page_size(page_size)?;

        let mut query = QueryBuilder::new().eq("shopId", shop_id);
        if !kind_name.is_empty() {
            query = query.regex("kindName", kind_name);
        }
        let query = query
            .sort("storageTime", SortDirection::Desc)
            .use_index(IndexHint::GOODS_BY_SHOP)
            .build();

        let page = store
            .query_page(&query, page_size, bookmark)?
            .into_page(|entry| Ok(serde_json::from_slice::<GoodsSummary>(&entry.value)?))?;
        Ok(page.to_json()?.into_bytes())
    }

    fn query_detail_by_map(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [json] = expect_args::<1>(args)?;
        let params: GoodsDetailQuery = serde_json::from_str(json)?;
        if params.shop_id.is_empty() || params.kind_id.is_empty() {
            return Err(GoodsError::MissingShopOrKind);
        }

        let optional = [
            ("goodsId", &params.goods_id),
            ("gsiStatus", &params.gsi_status),
            ("qcstatus", &params.gc_status),
        ];
        let query = optional
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .fold(
                QueryBuilder::new()
                    .eq("shopId", &params.shop_id)
                    .eq("kindId", &params.kind_id),
                |query, (field, value)| query.eq(field, value),
            )
            .sort("storageTime", SortDirection::Desc)
            .use_index(IndexHint::GOODS_BY_SHOP_AND_KIND)
            .build();

        let page = store
            .query_page(&query, params.page_size, &params.bookmark)?
            .into_page(raw_document)?;
        Ok(page.to_json()?.into_bytes())
    }

    fn query_friend_goods(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [json] = expect_args::<1>(args)?;
        let params: FriendGoodsQuery = serde_json::from_str(json)?;

        let mut query = QueryBuilder::new().one_of("shopId", params.shop_id_list.iter().cloned());
        if !params.goods_name.is_empty() {
            query = query.regex("kindName", &params.goods_name);
        }
        let query = query
            .sort("storageTime", SortDirection::Desc)
            .use_index(IndexHint::GOODS_BY_SHOP)
            .build();

        let page = store
            .query_page(&query, params.page_size, &params.bookmark)?
            .into_page(raw_document)?;
        Ok(page.to_json()?.into_bytes())
    }

    /// Newest goods record of the batch plus every order the order domain holds
    /// for it. A batch with no local goods still returns its orders.
    ///
    /// The order domain's reply is spliced in without being decoded. It may be a
    /// JSON array or a bare `{..},{..}` fragment, which is wrapped in brackets.
    #[instrument(skip(self, store, invoker, args))]
    async fn trace_by_batch(
        &self,
        store: &RecordStore<'_>,
        invoker: &ContractInvoker,
        args: &[String],
    ) -> Result<Vec<u8>, GoodsError> {
        let [batch_no] = expect_args::<1>(args)?;
        if batch_no.is_empty() {
            return Err(ContractError::MissingField("batchNo").into());
        }

        let good = {
            let query = QueryBuilder::new()
                .eq("batchNo", batch_no)
                .sort("storageTime", SortDirection::Desc)
                .use_index(IndexHint::GOODS_BY_STORAGE_TIME)
                .build();
            let mut cursor = store.query_all(&query)?;
            let first = cursor.next().transpose().map_err(ContractError::from)?;
            cursor.close().map_err(ContractError::from)?;
            first.map(raw_document).transpose()?
        };
        debug!(%batch_no, found = good.is_some(), "Local goods");

        let payload = invoker
            .invoke(&self.config.order_contract, "queryOrder", batch_no)
            .await?;
        let orders = order_array(payload)?;

        Ok(serde_json::to_vec(&TraceEnvelope { good, orders })?)
    }

    async fn relay(&self, invoker: &ContractInvoker, operation: &str, args: &[String]) -> Result<Vec<u8>, GoodsError> {
        let [json] = expect_args::<1>(args)?;
        Ok(invoker.invoke(&self.config.order_contract, operation, json).await?)
    }
}

#[async_trait]
impl Contract for GoodsContract {
    type Context = ContractInvoker;
    type Error = GoodsError;

    fn name(&self) -> &str {
        "goods"
    }

    async fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        invoker: &ContractInvoker,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, GoodsError> {
        let mut store = RecordStore::new(stub);
        match function {
            "addGoods" => self.add_goods(&mut store, args),
            "queryGoodsByStockId" => self.query_goods_by_stock_id(&store, args),
            "replaceGoods" => self.replace_goods(&mut store, args),
            "patchGoods" => self.patch_goods(&mut store, args),
            "updateGoodStatus" => self.update_good_status(&mut store, args),
            "updateGoodsStockFileNameOrPrice" => self.update_file_name_or_price(&mut store, args),
            "updateGoodsAmount" => self.update_goods_amount(&mut store, args),
            "queryGoodsShopIdAndKindName" => self.query_by_shop_and_kind_name(&store, args),
            "queryGoodsDetailByMap" => self.query_detail_by_map(&store, args),
            "queryFriendGoodsListByMap" => self.query_friend_goods(&store, args),
            "traceGoodsAndOrderByBatchNo" => self.trace_by_batch(&store, invoker, args).await,
            "addOrder" | "updateOrder" => self.relay(invoker, function, args).await,
            other => Err(ContractError::UnsupportedMethod(other.to_string()).into()),
        }
    }
}

fn tx_receipt(store: &RecordStore<'_>) -> Vec<u8> {
    store.tx_id().as_bytes().to_vec()
}

fn order_array(payload: Vec<u8>) -> Result<Box<RawValue>, GoodsError> {
    let text = String::from_utf8(payload)
        .map_err(|e| ContractError::Validation(format!("order payload is not UTF-8: {e}")))?;
    let array = if text.trim_start().starts_with('[') {
        text
    } else {
        format!("[{}]", text.trim())
    };
    Ok(RawValue::from_string(array)?)
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, GoodsError> {
    value.trim().parse().map_err(|_| GoodsError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}

fn parse_page_size(value: &str) -> Result<i32, GoodsError> {
    value.trim().parse().map_err(|_| GoodsError::NotAnInteger {
        field: "pageSize",
        value: value.to_string(),
    })
}
