//! Asset contract: fixed assets keyed by `id`.
//!
//! | function  | args            | returns  |
//! |-----------|-----------------|----------|
//! | `add`     | id, json        | id       |
//! | `getById` | id              | document |
//! | `update`  | id, json        | id       |
//! | `patch`   | id, patch json  | tx id    |

pub mod error;

pub use error::*;

use crate::clients::AssetClient;
use crate::framework::{expect_args, Contract, ContractError, ContractHost};
use crate::ledger::{ChaincodeStub, RecordStore};
use crate::model::{Asset, PatchDocument, Record};
use async_trait::async_trait;
use tracing::info;

/// Creates the Asset contract host and its client.
pub fn new(buffer_size: usize) -> (ContractHost<AssetContract>, AssetClient) {
    let (host, client) = ContractHost::new(AssetContract, buffer_size);
    (host, AssetClient::new(client))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssetContract;

impl AssetContract {
    fn add(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, AssetError> {
        let [id, json] = expect_args::<2>(args)?;
        store.replace_raw::<Asset>(id, json)?;
        info!(%id, "Asset added");
        Ok(id.clone().into_bytes())
    }

    fn get_by_id(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, AssetError> {
        let [id] = expect_args::<1>(args)?;
        Ok(store.get_raw::<Asset>(id)?)
    }

    fn update(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, AssetError> {
        let [id, json] = expect_args::<2>(args)?;
        store.replace_raw::<Asset>(id, json)?;
        Ok(id.clone().into_bytes())
    }

    fn patch(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, AssetError> {
        let [id, patch] = expect_args::<2>(args)?;
        let patch = PatchDocument::parse(patch)?;
        let asset: Asset = store.patch(id, &patch)?;
        info!(id = %asset.key(), fields = patch.len(), "Asset patched");
        Ok(store.tx_id().as_bytes().to_vec())
    }
}

#[async_trait]
impl Contract for AssetContract {
    type Context = ();
    type Error = AssetError;

    fn name(&self) -> &str {
        "asset"
    }

    async fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        _ctx: &(),
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, AssetError> {
        let mut store = RecordStore::new(stub);
        match function {
            "add" => self.add(&mut store, args),
            "getById" => self.get_by_id(&store, args),
            "update" => self.update(&mut store, args),
            "patch" => self.patch(&mut store, args),
            other => Err(ContractError::UnsupportedMethod(other.to_string()).into()),
        }
    }
}
