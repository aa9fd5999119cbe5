use crate::clients::record_client::RecordClient;
use crate::framework::{ContractClient, FrameworkError};
use crate::fund_contract::FundError;
use crate::model::FundBill;
use async_trait::async_trait;
use tracing::instrument;

/// Client for interacting with the Fund contract.
#[derive(Clone)]
pub struct FundClient {
    inner: ContractClient,
}

impl FundClient {
    pub fn new(inner: ContractClient) -> Self {
        Self { inner }
    }

    /// Returns the bill id.
    #[instrument(skip(self, bill), fields(id = %bill.id))]
    pub async fn add(&self, bill: &FundBill) -> Result<String, FundError> {
        let json = serde_json::to_string(bill)?;
        self.call_text("add", vec![bill.id.clone(), json]).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<FundBill, FundError> {
        self.call_json("getById", vec![id.to_string()]).await
    }

    pub async fn update(&self, bill: &FundBill) -> Result<String, FundError> {
        let json = serde_json::to_string(bill)?;
        self.call_text("update", vec![bill.id.clone(), json]).await
    }
}

#[async_trait]
impl RecordClient for FundClient {
    type Error = FundError;

    fn inner(&self) -> &ContractClient {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => FundError::NotFound(id),
            other => FundError::Communication(other.to_string()),
        }
    }
}
