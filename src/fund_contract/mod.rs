//! Fund contract: fund bills keyed by `id`.
//!
//! | function  | args     | returns  |
//! |-----------|----------|----------|
//! | `add`     | id, json | id       |
//! | `getById` | id       | document |
//! | `update`  | id, json | id       |

pub mod error;

pub use error::*;

use crate::clients::FundClient;
use crate::framework::{expect_args, Contract, ContractError, ContractHost};
use crate::ledger::{ChaincodeStub, RecordStore};
use crate::model::FundBill;
use async_trait::async_trait;
use tracing::info;

/// Creates the Fund contract host and its client.
pub fn new(buffer_size: usize) -> (ContractHost<FundContract>, FundClient) {
    let (host, client) = ContractHost::new(FundContract, buffer_size);
    (host, FundClient::new(client))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FundContract;

impl FundContract {
    /// Stores the bill under `id`. `add` and `update` both overwrite.
    fn put_bill(&self, store: &mut RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, FundError> {
        let [id, json] = expect_args::<2>(args)?;
        let bill: FundBill = store.replace_raw(id, json)?;
        info!(%id, district = %bill.district, "Fund bill stored");
        Ok(id.clone().into_bytes())
    }

    fn get_by_id(&self, store: &RecordStore<'_>, args: &[String]) -> Result<Vec<u8>, FundError> {
        let [id] = expect_args::<1>(args)?;
        Ok(store.get_raw::<FundBill>(id)?)
    }
}

#[async_trait]
impl Contract for FundContract {
    type Context = ();
    type Error = FundError;

    fn name(&self) -> &str {
        "fund"
    }

    async fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        _ctx: &(),
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, FundError> {
        let mut store = RecordStore::new(stub);
        match function {
            "add" | "update" => self.put_bill(&mut store, args),
            "getById" => self.get_by_id(&store, args),
            other => Err(ContractError::UnsupportedMethod(other.to_string()).into()),
        }
    }
}
