use ledger_contracts::lifecycle::{setup_tracing, LedgerNetwork, NetworkConfig};
use ledger_contracts::model::{FundBill, Goods, Order, PatchDocument, StockDirection};
use tracing::{error, info, info_span, Instrument};

#[tokio::main]
async fn main() {
    setup_tracing();

    let config = match NetworkConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };
    let network = LedgerNetwork::with_config(config);

    if let Err(e) = run_demo(&network).instrument(info_span!("demo")).await {
        error!(error = %e, "Demo failed");
    }

    if let Err(e) = network.shutdown().await {
        error!(error = %e, "Shutdown failed");
    }
}

async fn run_demo(network: &LedgerNetwork) -> Result<(), Box<dyn std::error::Error>> {
    let goods = Goods::default()
        .with_stock_id("S1")
        .with_batch_no("B1")
        .with_shop_id("222")
        .with_kind_id("K1")
        .with_kind_name("red apple")
        .with_stock_num("10")
        .with_storage_time("2019-05-01 08:00:00");
    let tx_id = network.goods_client.add_goods(&goods).await?;
    info!(%tx_id, "Goods added");

    let order = Order::default()
        .with_order_no("O1")
        .with_batch_no("B1")
        .with_goods_stock_id("S1")
        .with_seller_shop_id("222")
        .with_buyer_shop_id("333")
        .with_amount("3")
        .with_tran_time("2019-05-01 09:30:00");
    network.goods_client.add_order(&order).await?;

    network
        .goods_client
        .update_amount("S1", 3, StockDirection::Decrease)
        .await?;
    let stocked = network.goods_client.query_goods_by_stock_id("S1").await?;
    info!(stock_num = %stocked.stock_num, "Stock after sale");

    let patch = PatchDocument::new().set("orderNo", "O1").set("marketNo", "M-01");
    network.order_client.update_order(&patch).await?;

    let trace = network.goods_client.trace_batch("B1").await?;
    info!(
        good = ?trace.good.as_ref().map(|g| g.stock_id.as_str()),
        orders = trace.orders.len(),
        "Batch trace"
    );

    let page = network
        .goods_client
        .query_by_shop_and_kind_name("222", "apple", "", 10)
        .await?;
    info!(results = page.data.len(), bookmark = %page.bookmark, "Shop listing");

    let bill = FundBill::default()
        .with_id("F1")
        .with_district("north")
        .with_area("120");
    let id = network.fund_client.add(&bill).await?;
    info!(%id, "Fund bill added");

    Ok(())
}
