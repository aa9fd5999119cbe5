use crate::asset_contract::AssetError;
use crate::clients::record_client::RecordClient;
use crate::framework::{ContractClient, FrameworkError};
use crate::model::{Asset, PatchDocument};
use async_trait::async_trait;
use tracing::instrument;

/// Client for interacting with the Asset contract.
#[derive(Clone)]
pub struct AssetClient {
    inner: ContractClient,
}

impl AssetClient {
    pub fn new(inner: ContractClient) -> Self {
        Self { inner }
    }

    /// Registers `asset` under its own id. Returns the id.
    #[instrument(skip(self, asset), fields(id = %asset.id))]
    pub async fn add(&self, asset: &Asset) -> Result<String, AssetError> {
        let json = serde_json::to_string(asset)?;
        self.call_text("add", vec![asset.id.clone(), json]).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Asset, AssetError> {
        self.call_json("getById", vec![id.to_string()]).await
    }

    /// Replaces the stored document. Returns the id.
    pub async fn update(&self, asset: &Asset) -> Result<String, AssetError> {
        let json = serde_json::to_string(asset)?;
        self.call_text("update", vec![asset.id.clone(), json]).await
    }

    /// Returns the transaction id.
    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: &str, patch: &PatchDocument) -> Result<String, AssetError> {
        let json = serde_json::to_string(patch)?;
        self.call_text("patch", vec![id.to_string(), json]).await
    }
}

#[async_trait]
impl RecordClient for AssetClient {
    type Error = AssetError;

    fn inner(&self) -> &ContractClient {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => AssetError::NotFound(id),
            other => AssetError::Communication(other.to_string()),
        }
    }
}
