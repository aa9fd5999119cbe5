//! # Record Store Adapter
//!
//! Typed access to one domain's ledger state. Records live under their primary
//! identifier; absent keys surface as [`ContractError::NotFound`] for every
//! record kind.

use super::stub::ChaincodeStub;
use crate::framework::ContractError;
use crate::model::{merge, PatchDocument, Record};
use crate::query::{QueryCursor, QueryDocument};
use serde_json::{Map, Value};
use tracing::debug;

pub struct RecordStore<'s> {
    stub: &'s mut dyn ChaincodeStub,
}

impl<'s> RecordStore<'s> {
    pub fn new(stub: &'s mut dyn ChaincodeStub) -> Self {
        Self { stub }
    }

    pub fn tx_id(&self) -> &str {
        self.stub.tx_id()
    }

    /// Stored bytes of the `R` record under `key`, returned verbatim.
    pub fn get_raw<R: Record>(&self, key: &str) -> Result<Vec<u8>, ContractError> {
        let found = self.stub.get_state(key)?;
        debug!(kind = R::KIND, key, found = found.is_some(), "Get");
        found.ok_or_else(|| ContractError::NotFound {
            kind: R::KIND,
            key: key.to_string(),
        })
    }

    pub fn get<R: Record>(&self, key: &str) -> Result<R, ContractError> {
        let bytes = self.get_raw::<R>(key)?;
        Ok(R::decode(&bytes)?)
    }

    pub fn put_raw(&mut self, key: &str, bytes: Vec<u8>) -> Result<(), ContractError> {
        debug!(key, len = bytes.len(), "Put");
        self.stub.put_state(key, bytes)?;
        Ok(())
    }

    /// Encodes `record` and writes it back under `key`, the key it was read from.
    ///
    /// A record that lost its key field gets `key` back before it is encoded.
    pub fn put<R: Record>(&mut self, key: &str, record: &R) -> Result<(), ContractError> {
        if key.is_empty() {
            return Err(ContractError::MissingField(R::KEY_FIELD));
        }
        let bytes = if record.key().is_empty() {
            let mut keyed = record.clone();
            keyed.set_key(key);
            keyed.encode()?
        } else {
            check_key::<R>(key, record.key())?;
            record.encode()?
        };
        self.put_raw(key, bytes)
    }

    /// Stores a new record payload verbatim under the key it carries.
    pub fn insert_raw<R: Record>(&mut self, json: &str) -> Result<R, ContractError> {
        let record = R::decode(json.as_bytes())?;
        if record.key().is_empty() {
            return Err(ContractError::MissingField(R::KEY_FIELD));
        }
        self.put_raw(record.key(), json.as_bytes().to_vec())?;
        Ok(record)
    }

    /// Overwrites the document under `key` with a payload stored verbatim.
    ///
    /// A payload that names a different key is rejected. One that omits its key
    /// (or leaves it empty) is stored with `key` filled in.
    pub fn replace_raw<R: Record>(&mut self, key: &str, json: &str) -> Result<R, ContractError> {
        if key.is_empty() {
            return Err(ContractError::MissingField(R::KEY_FIELD));
        }
        let mut record = R::decode(json.as_bytes())?;
        if !record.key().is_empty() {
            check_key::<R>(key, record.key())?;
            self.put_raw(key, json.as_bytes().to_vec())?;
            return Ok(record);
        }

        let mut document: Map<String, Value> = serde_json::from_str(json)?;
        document.insert(R::KEY_FIELD.to_string(), Value::String(key.to_string()));
        debug!(kind = R::KIND, key, "Key filled in on replace");
        self.put_raw(key, serde_json::to_vec(&document)?)?;
        record.set_key(key);
        Ok(record)
    }

    /// Read-merge-write. The record must already exist, and the patch may not
    /// clear or change its key.
    pub fn patch<R: Record>(&mut self, key: &str, patch: &PatchDocument) -> Result<R, ContractError> {
        if let Some(found) = patch.get(R::KEY_FIELD) {
            check_key::<R>(key, found)?;
        }
        let current: R = self.get(key)?;
        let mut updated = merge(&current, patch);
        self.put(key, &updated)?;
        updated.set_key(key);
        Ok(updated)
    }

    pub fn query_page(
        &self,
        query: &QueryDocument,
        page_size: i32,
        bookmark: &str,
    ) -> Result<QueryCursor<'_>, ContractError> {
        let index = query.index();
        let query = query.to_json()?;
        debug!(%query, ?index, page_size, bookmark, "Paged query");
        Ok(QueryCursor::open(&*self.stub, &query, page_size, bookmark)?)
    }

    pub fn query_all(&self, query: &QueryDocument) -> Result<QueryCursor<'_>, ContractError> {
        let index = query.index();
        let query = query.to_json()?;
        debug!(%query, ?index, "Query");
        Ok(QueryCursor::open_all(&*self.stub, &query)?)
    }
}

fn check_key<R: Record>(expected: &str, found: &str) -> Result<(), ContractError> {
    if found.is_empty() {
        Err(ContractError::MissingField(R::KEY_FIELD))
    } else if found == expected {
        Ok(())
    } else {
        Err(ContractError::KeyMismatch {
            field: R::KEY_FIELD,
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::model::{Asset, Goods};
    use crate::query::QueryBuilder;

    #[test]
    fn test_missing_key_is_not_found_for_every_kind() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin("tx1");
        let store = RecordStore::new(&mut tx);

        let err = store.get::<Asset>("A1").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Asset A1 not found");
        assert!(store.get::<Goods>("S1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_put_writes_under_read_key() {
        let mut ledger = MemoryLedger::new();
        let writes = {
            let mut tx = ledger.begin("tx1");
            let mut store = RecordStore::new(&mut tx);
            store.put("S1", &Goods::default().with_stock_id("S1").with_stock_num("10")).unwrap();
            store.put("S2", &Goods::default().with_stock_num("4")).unwrap();
            assert!(matches!(
                store.put("", &Goods::default()),
                Err(ContractError::MissingField("stockId"))
            ));
            assert!(matches!(
                store.put("S1", &Goods::default().with_stock_id("S9")),
                Err(ContractError::KeyMismatch { .. })
            ));
            tx.into_writes()
        };
        ledger.commit(writes);

        let goods = Goods::decode(ledger.get("S1").unwrap()).unwrap();
        assert_eq!(goods.stock_num, "10");
        let healed = Goods::decode(ledger.get("S2").unwrap()).unwrap();
        assert_eq!((healed.stock_id.as_str(), healed.stock_num.as_str()), ("S2", "4"));
    }

    #[test]
    fn test_insert_keeps_payload_verbatim() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin("tx1");
        let payload = r#"{"orderNo":"O1", "extra":true}"#;
        {
            let mut store = RecordStore::new(&mut tx);
            let order: crate::model::Order = store.insert_raw(payload).unwrap();
            assert_eq!(order.order_no, "O1");
            let err = store.insert_raw::<crate::model::Order>(r#"{"batchNo":"B"}"#).unwrap_err();
            assert_eq!(err.to_string(), "orderNo is required");
        }
        assert_eq!(tx.writes().get("O1").map(Vec::as_slice), Some(payload.as_bytes()));
    }

    #[test]
    fn test_replace_rejects_foreign_key() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin("tx1");
        let mut store = RecordStore::new(&mut tx);
        let err = store
            .replace_raw::<Asset>("A1", r#"{"id":"A2"}"#)
            .unwrap_err();
        assert!(matches!(err, ContractError::KeyMismatch { field: "id", .. }));
    }

    #[test]
    fn test_replace_fills_in_omitted_key() {
        let mut ledger = MemoryLedger::new();
        let writes = {
            let mut tx = ledger.begin("tx1");
            let mut store = RecordStore::new(&mut tx);
            let asset: Asset = store.replace_raw("A1", r#"{"area":"12","extra":1}"#).unwrap();
            assert_eq!(asset.id, "A1");
            store.replace_raw::<Goods>("S1", r#"{"stockId":"","stockNum":"5"}"#).unwrap();
            tx.into_writes()
        };
        ledger.commit(writes);

        let stored: serde_json::Value = serde_json::from_slice(ledger.get("A1").unwrap()).unwrap();
        assert_eq!(stored, serde_json::json!({"id": "A1", "area": "12", "extra": 1}));
        assert_eq!(Goods::decode(ledger.get("S1").unwrap()).unwrap().stock_id, "S1");
    }

    #[test]
    fn test_patch_requires_existing_record() {
        let mut ledger = MemoryLedger::new();
        ledger.seed("A1", r#"{"id":"A1","area":"10","remark":"old"}"#);
        let mut tx = ledger.begin("tx1");
        let mut store = RecordStore::new(&mut tx);

        let patch = PatchDocument::new().set("remark", "new");
        let asset: Asset = store.patch("A1", &patch).unwrap();
        assert_eq!((asset.area.as_str(), asset.remark.as_str()), ("10", "new"));

        assert!(store.patch::<Asset>("A9", &patch).unwrap_err().is_not_found());
        let moved = PatchDocument::new().set("id", "A2");
        assert!(store.patch::<Asset>("A1", &moved).is_err());
    }

    #[test]
    fn test_patch_cannot_clear_key() {
        let mut ledger = MemoryLedger::new();
        ledger.seed("S1", r#"{"stockId":"S1","stockNum":"10"}"#);
        ledger.seed("S2", r#"{"stockNum":"3"}"#);
        let mut tx = ledger.begin("tx1");
        {
            let mut store = RecordStore::new(&mut tx);
            let cleared = PatchDocument::new().set("stockId", "").set("stockNum", "0");
            let err = store.patch::<Goods>("S1", &cleared).unwrap_err();
            assert_eq!(err.to_string(), "stockId is required");
        }
        assert!(tx.writes().is_empty());

        // A stored record missing its key is written back with it
        let mut store = RecordStore::new(&mut tx);
        let goods: Goods = store.patch("S2", &PatchDocument::new().set("price", "1")).unwrap();
        assert_eq!(goods.stock_id, "S2");
    }

    #[test]
    fn test_query_through_adapter() {
        let mut ledger = MemoryLedger::new();
        ledger.seed("S1", r#"{"stockId":"S1","shopId":"1"}"#);
        ledger.seed("S2", r#"{"stockId":"S2","shopId":"2"}"#);
        let mut tx = ledger.begin("tx1");
        let store = RecordStore::new(&mut tx);

        let query = QueryBuilder::new().eq("shopId", "2").build();
        let keys: Vec<String> = store
            .query_all(&query)
            .unwrap()
            .map(|kv| kv.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["S2"]);
    }
}
