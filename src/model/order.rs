use super::record::ledger_record;

ledger_record! {
    /// A trade between two market stalls, keyed by `orderNo`.
    ///
    /// Amounts, weights and timestamps are strings on the wire.
    pub struct Order keyed by order_no as "orderNo" {
        order_no => "orderNo",
        batch_no => "batchNo",
        market_no => "marketNo",
        market_name => "marketName",
        goods_name => "goodsName",
        goods_origin => "goodsOrigin",
        goods_id => "goodsId",
        amount => "amount",
        weight => "weight",
        seller_shop_id => "sellerShopId",
        seller_shop => "sellerShop",
        seller_id => "sellerId",
        seller => "seller",
        buyer_shop_id => "buyerShopId",
        buyer_shop => "buyerShop",
        buyer_id => "buyerId",
        buyer => "buyer",
        /// `stockId` of the goods record this order drew from.
        goods_stock_id => "goodsStockId",
        tran_time => "tranTime",
        submit_time => "submitTime",
    }
}
