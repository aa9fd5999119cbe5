//! Order contract: trades keyed by `orderNo`.
//!
//! `queryOrder` answers the goods domain's batch traces with a JSON array of
//! every order in a batch, most recent trade first.

pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::framework::{expect_args, Contract, ContractError, ContractHost};
use crate::ledger::{ChaincodeStub, RecordStore};
use crate::model::{Order, PatchDocument, Record};
use crate::query::{IndexHint, QueryBuilder, SortDirection};
use async_trait::async_trait;
use serde_json::value::RawValue;
use tracing::{debug, info};

/// Creates the Order contract host and its client.
pub fn new(buffer_size: usize) -> (ContractHost<OrderContract>, OrderClient) {
    let (host, client) = ContractHost::new(OrderContract, buffer_size);
    (host, OrderClient::new(client))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderContract;

impl OrderContract {
    fn add_order(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, OrderError> {
        let [json] = expect_args::<1>(args)?;
        let order: Order = store.insert_raw(json)?;
        info!(order_no = %order.order_no, batch_no = %order.batch_no, "Order added");
        Ok(store.tx_id().as_bytes().to_vec())
    }

    fn get_order(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, OrderError> {
        let [order_no] = expect_args::<1>(args)?;
        Ok(store.get_raw::<Order>(order_no)?)
    }

    fn replace_order(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, OrderError> {
        let [order_no, json] = expect_args::<2>(args)?;
        store.replace_raw::<Order>(order_no, json)?;
        Ok(store.tx_id().as_bytes().to_vec())
    }

    /// Patches the order named by the patch's own `orderNo`.
    fn update_order(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, OrderError> {
        let [json] = expect_args::<1>(args)?;
        let patch = PatchDocument::parse(json)?;
        let order_no = match patch.get(Order::KEY_FIELD) {
            Some(order_no) if !order_no.is_empty() => order_no.to_string(),
            _ => return Err(ContractError::MissingField(Order::KEY_FIELD).into()),
        };
        store.patch::<Order>(&order_no, &patch)?;
        info!(%order_no, fields = patch.len(), "Order updated");
        Ok(store.tx_id().as_bytes().to_vec())
    }

    fn query_order(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, OrderError> {
        let [batch_no] = expect_args::<1>(args)?;
        if batch_no.is_empty() {
            return Err(ContractError::MissingField("batchNo").into());
        }
        let query = QueryBuilder::new()
            .eq("batchNo", batch_no)
            .sort("tranTime", SortDirection::Desc)
            .use_index(IndexHint::ORDERS_BY_BATCH)
            .build();

        let mut orders: Vec<Box<RawValue>> = Vec::new();
        for entry in store.query_all(&query)? {
            let entry = entry.map_err(ContractError::from)?;
            let raw = serde_json::from_slice(&entry.value).map_err(|source| {
                OrderError::CorruptRecord { key: entry.key.clone(), source }
            })?;
            orders.push(raw);
        }
        debug!(%batch_no, count = orders.len(), "Orders in batch");
        Ok(serde_json::to_vec(&orders)?)
    }
}

#[async_trait]
impl Contract for OrderContract {
    type Context = ();
    type Error = OrderError;

    fn name(&self) -> &str {
        "order"
    }

    async fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        _ctx: &(),
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, OrderError> {
        let mut store = RecordStore::new(stub);
        match function {
            "addOrder" => self.add_order(&mut store, args),
            "getOrder" => self.get_order(&store, args),
            "replaceOrder" => self.replace_order(&mut store, args),
            "updateOrder" => self.update_order(&mut store, args),
            "queryOrder" => self.query_order(&store, args),
            other => Err(ContractError::UnsupportedMethod(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    async fn call(ledger: &mut MemoryLedger, function: &str, args: &[&str]) -> Result<Vec<u8>, OrderError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut tx = ledger.begin("tx-order");
        let result = OrderContract.invoke(&mut tx, &(), function, &args).await;
        let writes = tx.into_writes();
        if result.is_ok() {
            ledger.commit(writes);
        }
        result
    }

    fn order(order_no: &str, batch_no: &str, tran_time: &str) -> String {
        let order = Order::default()
            .with_order_no(order_no)
            .with_batch_no(batch_no)
            .with_tran_time(tran_time)
            .with_market_no("aaaa")
            .with_seller("alice");
        serde_json::to_string(&order).unwrap()
    }

    #[tokio::test]
    async fn test_update_order_patches_only_named_fields() {
        let mut ledger = MemoryLedger::new();
        call(&mut ledger, "addOrder", &[&*order("O1", "B1", "1")]).await.unwrap();
        let before = Order::decode(ledger.get("O1").unwrap()).unwrap();

        call(&mut ledger, "updateOrder", &[r#"{"orderNo":"O1","marketNo":"eeee"}"#])
            .await
            .unwrap();

        let after = Order::decode(&call(&mut ledger, "getOrder", &["O1"]).await.unwrap()).unwrap();
        assert_eq!(after.order_no, "O1");
        assert_eq!(after.market_no, "eeee");
        assert_eq!(after, Order { market_no: "eeee".into(), ..before });
    }

    #[tokio::test]
    async fn test_update_order_requires_order_no() {
        let mut ledger = MemoryLedger::new();
        let err = call(&mut ledger, "updateOrder", &[r#"{"marketNo":"eeee"}"#]).await.unwrap_err();
        assert_eq!(err.to_string(), "orderNo is required");
        let err = call(&mut ledger, "updateOrder", &[r#"{"orderNo":"O404"}"#]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_query_order_returns_batch_newest_first() {
        let mut ledger = MemoryLedger::new();
        call(&mut ledger, "addOrder", &[&*order("O1", "B1", "2019-01-01")]).await.unwrap();
        call(&mut ledger, "addOrder", &[&*order("O2", "B2", "2019-01-02")]).await.unwrap();
        call(&mut ledger, "addOrder", &[&*order("O3", "B1", "2019-01-03")]).await.unwrap();

        let payload = call(&mut ledger, "queryOrder", &["B1"]).await.unwrap();
        let orders: Vec<Order> = serde_json::from_slice(&payload).unwrap();
        let numbers: Vec<&str> = orders.iter().map(|o| o.order_no.as_str()).collect();
        assert_eq!(numbers, vec!["O3", "O1"]);

        let empty = call(&mut ledger, "queryOrder", &["B9"]).await.unwrap();
        assert_eq!(empty, b"[]");
    }

    #[tokio::test]
    async fn test_add_order_requires_order_no() {
        let mut ledger = MemoryLedger::new();
        let err = call(&mut ledger, "addOrder", &[r#"{"batchNo":"B1"}"#]).await.unwrap_err();
        assert_eq!(err.to_string(), "orderNo is required");
        assert!(ledger.is_empty());
    }
}
