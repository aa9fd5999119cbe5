use ledger_contracts::clients::RecordClient;
use ledger_contracts::lifecycle::{LedgerNetwork, NetworkConfig};
use ledger_contracts::model::{
    Asset, FriendGoodsQuery, FundBill, Goods, GoodsDetailQuery, Order, PatchDocument, StockDirection,
};

fn goods(stock_id: &str, batch_no: &str, kind_name: &str, storage_time: &str) -> Goods {
    Goods::default()
        .with_stock_id(stock_id)
        .with_batch_no(batch_no)
        .with_shop_id("222")
        .with_kind_id("K1")
        .with_kind_name(kind_name)
        .with_stock_num("10")
        .with_storage_time(storage_time)
}

fn order(order_no: &str, batch_no: &str, tran_time: &str) -> Order {
    Order::default()
        .with_order_no(order_no)
        .with_batch_no(batch_no)
        .with_market_no("aaaa")
        .with_tran_time(tran_time)
}

/// Full end-to-end test with every domain hosted.
#[tokio::test]
async fn test_stock_adjustment_and_trace() {
    let network = LedgerNetwork::new();

    let tx_id = network
        .goods_client
        .add_goods(&goods("S1", "B1", "apple", "1"))
        .await
        .expect("Failed to add goods");
    assert!(tx_id.starts_with("goods-"));

    network
        .goods_client
        .update_amount("S1", 3, StockDirection::Increase)
        .await
        .expect("Failed to adjust stock");
    let stored = network.goods_client.query_goods_by_stock_id("S1").await.unwrap();
    assert_eq!(stored.stock_num, "13");

    // Orders go in both directly and relayed through the goods domain
    network.order_client.add_order(&order("O1", "B1", "2019-01-01")).await.unwrap();
    let relayed = network
        .goods_client
        .add_order(&order("O2", "B1", "2019-01-02"))
        .await
        .unwrap();
    assert!(relayed.starts_with("order-"));

    let trace = network.goods_client.trace_batch("B1").await.unwrap();
    assert_eq!(trace.good.map(|g| g.stock_id), Some("S1".to_string()));
    let numbers: Vec<String> = trace.orders.into_iter().map(|o| o.order_no).collect();
    assert_eq!(numbers, vec!["O2", "O1"]);

    network.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_patch_order_through_goods_relay() {
    let network = LedgerNetwork::new();
    let before = order("O1", "B1", "2019-01-01").with_seller("alice");
    network.order_client.add_order(&before).await.unwrap();

    let patch = PatchDocument::new().set("orderNo", "O1").set("marketNo", "eeee");
    network.goods_client.update_order(&patch).await.unwrap();

    let after = network.order_client.get_order("O1").await.unwrap();
    assert_eq!(after, Order { market_no: "eeee".into(), ..before });

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_not_found_is_consistent_across_domains() {
    let network = LedgerNetwork::new();

    assert!(network.asset_client.get_by_id("A404").await.unwrap_err().is_not_found());
    assert!(network
        .goods_client
        .query_goods_by_stock_id("S404")
        .await
        .unwrap_err()
        .is_not_found());
    assert!(network.order_client.get_order("O404").await.unwrap_err().is_not_found());
    assert!(network.fund_client.get_by_id("F404").await.unwrap_err().is_not_found());

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_asset_lifecycle() {
    let network = LedgerNetwork::new();
    let asset = Asset::default()
        .with_id("A1")
        .with_asset_name("cold store")
        .with_area("300");

    assert_eq!(network.asset_client.add(&asset).await.unwrap(), "A1");
    let tx_id = network
        .asset_client
        .patch("A1", &PatchDocument::new().set("remark", "leased"))
        .await
        .unwrap();
    assert!(tx_id.starts_with("asset-"));

    let stored = network.asset_client.get_by_id("A1").await.unwrap();
    assert_eq!(stored, asset.clone().with_remark("leased"));

    network.asset_client.update(&asset.clone().with_area("310")).await.unwrap();
    let stored = network.asset_client.get_by_id("A1").await.unwrap();
    assert_eq!((stored.area.as_str(), stored.remark.as_str()), ("310", ""));

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_paged_listings_walk_to_the_end() {
    let network = LedgerNetwork::new();
    for (i, kind_name) in ["apple", "green apple", "pear", "red apple", "crab apple"]
        .iter()
        .enumerate()
    {
        let stock_id = format!("S{i}");
        network
            .goods_client
            .add_goods(&goods(&stock_id, "B1", kind_name, &i.to_string()))
            .await
            .unwrap();
    }

    let mut kinds = Vec::new();
    let mut bookmark = String::new();
    loop {
        let page = network
            .goods_client
            .query_by_shop_and_kind_name("222", "apple", &bookmark, 2)
            .await
            .unwrap();
        if page.data.is_empty() {
            break;
        }
        kinds.extend(page.data.into_iter().map(|s| s.kind_name));
        bookmark = page.bookmark;
    }
    assert_eq!(kinds, vec!["crab apple", "red apple", "green apple", "apple"]);

    let detail = network
        .goods_client
        .query_detail(&GoodsDetailQuery {
            shop_id: "222".into(),
            kind_id: "K1".into(),
            page_size: 3,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(detail.data.len(), 3);
    assert_eq!(detail.bookmark, "S2");

    let friends = network
        .goods_client
        .query_friend_goods(&FriendGoodsQuery {
            shop_id_list: vec!["999".into()],
            page_size: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(friends.data.is_empty());
    assert_eq!(friends.bookmark, "");

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_operation_commits_nothing() {
    let network = LedgerNetwork::new();
    network.goods_client.add_goods(&goods("S1", "B1", "apple", "1")).await.unwrap();

    let err = network
        .goods_client
        .call("updateGoodsAmount", vec!["S1".into(), "2".into(), "up".into()])
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Goods contract communication error: updateType should be increase or decrease, get up"
    );

    let err = network
        .goods_client
        .call("queryGoodsByStockId", vec![])
        .await
        .unwrap_err();
    assert!(err.to_string().ends_with("args length should be 1, got 0"));

    let stored = network.goods_client.query_goods_by_stock_id("S1").await.unwrap();
    assert_eq!(stored.stock_num, "10");

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_custom_order_domain_name() {
    let config = NetworkConfig {
        order_contract: "order-v2".into(),
        ..Default::default()
    };
    let network = LedgerNetwork::with_config(config);
    network.goods_client.add_order(&order("O1", "B5", "1")).await.unwrap();

    let trace = network.goods_client.trace_batch("B5").await.unwrap();
    assert!(trace.good.is_none());
    assert_eq!(trace.orders.len(), 1);

    network.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fund_bill_lifecycle() {
    let network = LedgerNetwork::new();
    let bill = FundBill::default()
        .with_id("F1")
        .with_district("north")
        .with_assets_used("office")
        .with_is_mortgage("0");

    assert_eq!(network.fund_client.add(&bill).await.unwrap(), "F1");
    assert_eq!(network.fund_client.get_by_id("F1").await.unwrap(), bill);

    let moved = bill.clone().with_district("south");
    assert_eq!(network.fund_client.update(&moved).await.unwrap(), "F1");
    assert_eq!(network.fund_client.get_by_id("F1").await.unwrap().district, "south");

    network.shutdown().await.unwrap();
}
