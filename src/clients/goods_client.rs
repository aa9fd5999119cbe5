use crate::clients::record_client::RecordClient;
use crate::framework::{ContractClient, FrameworkError};
use crate::goods_contract::{BatchTrace, GoodsError};
use crate::model::{
    FriendGoodsQuery, Goods, GoodsDetailQuery, GoodsSummary, Order, PatchDocument, StockDirection,
};
use crate::query::Page;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Goods contract.
///
/// Order operations routed through here are relayed by the goods domain to
/// whichever order domain it was deployed against.
#[derive(Clone)]
pub struct GoodsClient {
    inner: ContractClient,
}

impl GoodsClient {
    pub fn new(inner: ContractClient) -> Self {
        Self { inner }
    }

    /// Returns the transaction id.
    #[instrument(skip(self, goods), fields(stock_id = %goods.stock_id))]
    pub async fn add_goods(&self, goods: &Goods) -> Result<String, GoodsError> {
        debug!(?goods, "add_goods called");
        let json = serde_json::to_string(goods)?;
        self.call_text("addGoods", vec![json]).await
    }

    pub async fn query_goods_by_stock_id(&self, stock_id: &str) -> Result<Goods, GoodsError> {
        self.call_json("queryGoodsByStockId", vec![stock_id.to_string()]).await
    }

    pub async fn replace_goods(&self, goods: &Goods) -> Result<String, GoodsError> {
        let json = serde_json::to_string(goods)?;
        self.call_text("replaceGoods", vec![goods.stock_id.clone(), json]).await
    }

    pub async fn patch_goods(&self, stock_id: &str, patch: &PatchDocument) -> Result<String, GoodsError> {
        let json = serde_json::to_string(patch)?;
        self.call_text("patchGoods", vec![stock_id.to_string(), json]).await
    }

    pub async fn update_status(&self, stock_id: &str, gsi_status: &str) -> Result<String, GoodsError> {
        self.call_text("updateGoodStatus", vec![stock_id.to_string(), gsi_status.to_string()])
            .await
    }

    /// Empty strings leave the corresponding field unchanged.
    pub async fn update_file_name_or_price(
        &self,
        stock_id: &str,
        file_name: &str,
        price: &str,
    ) -> Result<String, GoodsError> {
        let args = vec![stock_id.to_string(), file_name.to_string(), price.to_string()];
        self.call_text("updateGoodsStockFileNameOrPrice", args).await
    }

    #[instrument(skip(self))]
    pub async fn update_amount(
        &self,
        stock_id: &str,
        amount: i64,
        direction: StockDirection,
    ) -> Result<String, GoodsError> {
        info!("Sending stock adjustment");
        self.call_text(
            "updateGoodsAmount",
            vec![stock_id.to_string(), amount.to_string(), direction.as_flag().to_string()],
        )
        .await
    }

    /// One page of a stall's goods whose category matches `kind_name`.
    pub async fn query_by_shop_and_kind_name(
        &self,
        shop_id: &str,
        kind_name: &str,
        bookmark: &str,
        page_size: i32,
    ) -> Result<Page<GoodsSummary>, GoodsError> {
        let args = vec![
            shop_id.to_string(),
            kind_name.to_string(),
            bookmark.to_string(),
            page_size.to_string(),
        ];
        self.call_json("queryGoodsShopIdAndKindName", args).await
    }

    pub async fn query_detail(&self, query: &GoodsDetailQuery) -> Result<Page<Goods>, GoodsError> {
        let json = serde_json::to_string(query)?;
        self.call_json("queryGoodsDetailByMap", vec![json]).await
    }

    pub async fn query_friend_goods(&self, query: &FriendGoodsQuery) -> Result<Page<Goods>, GoodsError> {
        let json = serde_json::to_string(query)?;
        self.call_json("queryFriendGoodsListByMap", vec![json]).await
    }

    #[instrument(skip(self))]
    pub async fn trace_batch(&self, batch_no: &str) -> Result<BatchTrace, GoodsError> {
        self.call_json("traceGoodsAndOrderByBatchNo", vec![batch_no.to_string()])
            .await
    }

    /// Adds an order through the goods domain. Returns the order domain's tx id.
    pub async fn add_order(&self, order: &Order) -> Result<String, GoodsError> {
        let json = serde_json::to_string(order)?;
        self.call_text("addOrder", vec![json]).await
    }

    pub async fn update_order(&self, patch: &PatchDocument) -> Result<String, GoodsError> {
        let json = serde_json::to_string(patch)?;
        self.call_text("updateOrder", vec![json]).await
    }
}

#[async_trait]
impl RecordClient for GoodsClient {
    type Error = GoodsError;

    fn inner(&self) -> &ContractClient {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(stock_id) => GoodsError::NotFound(stock_id),
            other => GoodsError::Communication(other.to_string()),
        }
    }
}
