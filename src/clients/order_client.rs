use crate::clients::record_client::RecordClient;
use crate::framework::{ContractClient, FrameworkError};
use crate::model::{Order, PatchDocument};
use crate::order_contract::OrderError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Order contract.
#[derive(Clone)]
pub struct OrderClient {
    inner: ContractClient,
}

impl OrderClient {
    pub fn new(inner: ContractClient) -> Self {
        Self { inner }
    }

    /// Returns the transaction id.
    #[instrument(skip(self, order), fields(order_no = %order.order_no))]
    pub async fn add_order(&self, order: &Order) -> Result<String, OrderError> {
        debug!(?order, "add_order called");
        let json = serde_json::to_string(order)?;
        self.call_text("addOrder", vec![json]).await
    }

    pub async fn get_order(&self, order_no: &str) -> Result<Order, OrderError> {
        self.call_json("getOrder", vec![order_no.to_string()]).await
    }

    pub async fn replace_order(&self, order: &Order) -> Result<String, OrderError> {
        let json = serde_json::to_string(order)?;
        self.call_text("replaceOrder", vec![order.order_no.clone(), json]).await
    }

    /// Patches the order named by the patch's `orderNo`. Returns the transaction id.
    #[instrument(skip(self, patch))]
    pub async fn update_order(&self, patch: &PatchDocument) -> Result<String, OrderError> {
        let json = serde_json::to_string(patch)?;
        self.call_text("updateOrder", vec![json]).await
    }

    /// Every order of a batch, most recent trade first.
    pub async fn query_order(&self, batch_no: &str) -> Result<Vec<Order>, OrderError> {
        self.call_json("queryOrder", vec![batch_no.to_string()]).await
    }
}

#[async_trait]
impl RecordClient for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ContractClient {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(order_no) => OrderError::NotFound(order_no),
            other => OrderError::Communication(other.to_string()),
        }
    }
}
