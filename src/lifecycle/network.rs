use crate::clients::{AssetClient, FundClient, GoodsClient, OrderClient, RecordClient};
use crate::framework::ContractInvoker;
use crate::ledger::MemoryLedger;
use crate::lifecycle::config::NetworkConfig;
use crate::query::IndexHint;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runtime orchestrator for the record domains.
///
/// `LedgerNetwork` is responsible for:
/// - **Lifecycle Management**: starting and stopping every contract host
/// - **Dependency Wiring**: routing the goods domain's cross-domain calls to the order domain
/// - **Index Registration**: declaring the secondary indexes each domain's queries rely on
///
/// # Example
///
/// ```ignore
/// let network = LedgerNetwork::new();
///
/// let tx_id = network.goods_client.add_goods(&goods).await?;
/// let trace = network.goods_client.trace_batch("B1").await?;
///
/// network.shutdown().await?;
/// ```
pub struct LedgerNetwork {
    pub asset_client: AssetClient,
    pub fund_client: FundClient,
    pub goods_client: GoodsClient,
    pub order_client: OrderClient,
    config: NetworkConfig,
    handles: Vec<(&'static str, JoinHandle<MemoryLedger>)>,
}

impl LedgerNetwork {
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    /// Spawns every host, each in its own Tokio task.
    pub fn with_config(config: NetworkConfig) -> Self {
        let buffer = config.channel_buffer;

        // 1. Create hosts (no dependencies yet)
        let (asset_host, asset_client) = crate::asset_contract::new(buffer);
        let (fund_host, fund_client) = crate::fund_contract::new(buffer);
        let (goods_host, goods_client) = crate::goods_contract::new(config.goods(), buffer);
        let (order_host, order_client) = crate::order_contract::new(buffer);

        let goods_host = goods_host.with_ledger(
            MemoryLedger::new()
                .with_index(IndexHint::GOODS_BY_SHOP.0, IndexHint::GOODS_BY_SHOP.1)
                .with_index(IndexHint::GOODS_BY_SHOP_AND_KIND.0, IndexHint::GOODS_BY_SHOP_AND_KIND.1)
                .with_index(IndexHint::GOODS_BY_STORAGE_TIME.0, IndexHint::GOODS_BY_STORAGE_TIME.1),
        );
        let order_host = order_host.with_ledger(
            MemoryLedger::new()
                .with_index(IndexHint::ORDERS_BY_BATCH.0, IndexHint::ORDERS_BY_BATCH.1),
        );

        // 2. Start hosts with injected context
        // Goods reaches the order domain through the invoker
        let invoker = ContractInvoker::new()
            .register(config.order_contract.clone(), order_client.inner().clone());

        let handles = vec![
            ("asset", tokio::spawn(asset_host.run(()))),
            ("fund", tokio::spawn(fund_host.run(()))),
            ("goods", tokio::spawn(goods_host.run(invoker))),
            ("order", tokio::spawn(order_host.run(()))),
        ];
        info!(order_contract = %config.order_contract, buffer, "Network started");

        Self {
            asset_client,
            fund_client,
            goods_client,
            order_client,
            config,
            handles,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Drops every client, then waits for each host to drain and stop.
    ///
    /// The order host stops only after the goods host has released its route
    /// to it.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down network...");

        drop(self.asset_client);
        drop(self.fund_client);
        drop(self.goods_client);
        drop(self.order_client);

        for (name, handle) in self.handles {
            match handle.await {
                Ok(ledger) => info!(contract = name, records = ledger.len(), "Host stopped"),
                Err(e) => {
                    error!(contract = name, "Host task failed: {:?}", e);
                    return Err(format!("{name} host task failed: {e:?}"));
                }
            }
        }

        info!("Network shutdown complete.");
        Ok(())
    }
}

impl Default for LedgerNetwork {
    fn default() -> Self {
        Self::new()
    }
}
