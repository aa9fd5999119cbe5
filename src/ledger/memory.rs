//! # In-Memory Ledger
//!
//! A single-node stand-in for the ledger and its document index. It keeps the
//! committed world state in an ordered map, hands each invocation a [`TxContext`]
//! that buffers writes, and evaluates rich queries (`$eq`, `$regex`, `$in`, `sort`,
//! `use_index`) against the JSON values it holds.
//!
//! Bookmarks are the key of the last record of a page. An exhausted query returns
//! an empty page and echoes the bookmark it was given.

use super::stub::{ChaincodeStub, KeyValue, QueryMetadata, StateQueryIterator, StoreError};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Committed world state of one contract domain.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    indexes: BTreeSet<(String, String)>,
    rejected_writes: Option<String>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secondary index. Once any index is registered, queries whose
    /// `use_index` hint names an unknown index are rejected.
    pub fn with_index(mut self, design_doc: impl Into<String>, name: impl Into<String>) -> Self {
        self.indexes.insert((design_doc.into(), name.into()));
        self
    }

    /// Makes every `put_state` fail with `reason`.
    pub fn reject_writes(mut self, reason: impl Into<String>) -> Self {
        self.rejected_writes = Some(reason.into());
        self
    }

    /// Writes directly into committed state, bypassing any transaction.
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.state.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Returns a tracker that keeps reporting open iterator handles after the
    /// ledger has been moved into a host.
    pub fn iterator_tracker(&self) -> IteratorTracker {
        IteratorTracker(self.open_iterators.clone())
    }

    /// Opens a transaction context over the current committed state.
    pub fn begin(&self, tx_id: impl Into<String>) -> TxContext<'_> {
        TxContext {
            ledger: self,
            tx_id: tx_id.into(),
            writes: BTreeMap::new(),
        }
    }

    /// Applies a transaction's write set. Returns the number of keys written.
    pub fn commit(&mut self, writes: BTreeMap<String, Vec<u8>>) -> usize {
        let count = writes.len();
        self.state.extend(writes);
        count
    }

    fn execute(&self, query: &str) -> Result<Vec<KeyValue>, StoreError> {
        let parsed = ParsedQuery::parse(query)?;
        if let Some((design_doc, name)) = &parsed.index {
            if !self.indexes.is_empty()
                && !self.indexes.contains(&(design_doc.clone(), name.clone()))
            {
                return Err(StoreError::InvalidQuery(format!(
                    "no index {name} in design document {design_doc}"
                )));
            }
        }

        let mut matches: Vec<(Value, KeyValue)> = Vec::new();
        for (key, bytes) in &self.state {
            let doc: Value = match serde_json::from_slice(bytes) {
                Ok(doc @ Value::Object(_)) => doc,
                _ => {
                    debug!(key = %key, "Skipping non-document value");
                    continue;
                }
            };
            if parsed.matches(&doc) {
                matches.push((
                    doc,
                    KeyValue {
                        key: key.clone(),
                        value: bytes.clone(),
                    },
                ));
            }
        }

        matches.sort_by(|(a, ka), (b, kb)| parsed.compare(a, b).then_with(|| ka.key.cmp(&kb.key)));
        Ok(matches.into_iter().map(|(_, kv)| kv).collect())
    }

    fn open_iterator(&self, items: Vec<KeyValue>) -> MemoryIterator {
        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        MemoryIterator {
            items: items.into_iter(),
            open: self.open_iterators.clone(),
            closed: false,
        }
    }
}

/// Observes how many query iterators are currently open on a ledger.
#[derive(Debug, Clone)]
pub struct IteratorTracker(Arc<AtomicUsize>);

impl IteratorTracker {
    pub fn open_count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Iterator handle over a materialised result set.
///
/// Dropping it without calling `close` leaves the handle counted as open.
#[derive(Debug)]
pub struct MemoryIterator {
    items: std::vec::IntoIter<KeyValue>,
    open: Arc<AtomicUsize>,
    closed: bool,
}

impl Iterator for MemoryIterator {
    type Item = Result<KeyValue, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return Some(Err(StoreError::Iterator("iterator already closed".into())));
        }
        self.items.next().map(Ok)
    }
}

impl StateQueryIterator for MemoryIterator {
    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Per-invocation view of a [`MemoryLedger`].
///
/// Reads observe committed state only; writes stay buffered until the host
/// commits them with [`MemoryLedger::commit`].
#[derive(Debug)]
pub struct TxContext<'a> {
    ledger: &'a MemoryLedger,
    tx_id: String,
    writes: BTreeMap<String, Vec<u8>>,
}

impl TxContext<'_> {
    pub fn writes(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.writes
    }

    pub fn into_writes(self) -> BTreeMap<String, Vec<u8>> {
        self.writes
    }
}

impl ChaincodeStub for TxContext<'_> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.ledger.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if let Some(reason) = &self.ledger.rejected_writes {
            return Err(StoreError::Backend(reason.clone()));
        }
        if key.is_empty() {
            return Err(StoreError::Backend("key must not be an empty string".into()));
        }
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_query_result(
        &self,
        query: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError> {
        let matches = self.ledger.execute(query)?;
        debug!(matched = matches.len(), "Rich query");
        Ok(Box::new(self.ledger.open_iterator(matches)))
    }

    fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(Box<dyn StateQueryIterator + '_>, QueryMetadata), StoreError> {
        if page_size <= 0 {
            return Err(StoreError::InvalidPageSize(page_size));
        }
        let matches = self.ledger.execute(query)?;
        let start = if bookmark.is_empty() {
            0
        } else {
            matches
                .iter()
                .position(|kv| kv.key == bookmark)
                .map(|idx| idx + 1)
                .ok_or_else(|| StoreError::InvalidBookmark(bookmark.to_string()))?
        };

        let page: Vec<KeyValue> = matches
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        let metadata = QueryMetadata {
            bookmark: page
                .last()
                .map(|kv| kv.key.clone())
                .unwrap_or_else(|| bookmark.to_string()),
            fetched_count: page.len(),
        };
        debug!(fetched = metadata.fetched_count, bookmark = %metadata.bookmark, "Paged rich query");
        Ok((Box::new(self.ledger.open_iterator(page)), metadata))
    }
}

// =============================================================================
// RICH QUERY EVALUATION
// =============================================================================

#[derive(Debug)]
enum Predicate {
    Eq(Value),
    Regex(Regex),
    In(Vec<Value>),
}

impl Predicate {
    fn test(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Predicate::Eq(expected), Some(actual)) => expected == actual,
            (Predicate::Regex(re), Some(Value::String(actual))) => re.is_match(actual),
            (Predicate::In(options), Some(actual)) => options.contains(actual),
            _ => false,
        }
    }
}

#[derive(Debug)]
struct ParsedQuery {
    selector: Vec<(String, Predicate)>,
    sort: Vec<(String, bool)>,
    index: Option<(String, String)>,
}

impl ParsedQuery {
    fn parse(query: &str) -> Result<Self, StoreError> {
        let invalid = |msg: String| StoreError::InvalidQuery(msg);
        let doc: Value = serde_json::from_str(query).map_err(|e| invalid(e.to_string()))?;
        let doc = doc
            .as_object()
            .ok_or_else(|| invalid("query must be a JSON object".into()))?;

        let selector = doc
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| invalid("selector object is required".into()))?;
        let mut predicates = Vec::with_capacity(selector.len());
        for (field, condition) in selector {
            let Value::Object(operators) = condition else {
                predicates.push((field.clone(), Predicate::Eq(condition.clone())));
                continue;
            };
            for (operator, operand) in operators {
                let predicate = match operator.as_str() {
                    "$eq" => Predicate::Eq(operand.clone()),
                    "$regex" => {
                        let pattern = operand
                            .as_str()
                            .ok_or_else(|| invalid(format!("$regex on {field} must be a string")))?;
                        Predicate::Regex(Regex::new(pattern).map_err(|e| invalid(e.to_string()))?)
                    }
                    "$in" => Predicate::In(
                        operand
                            .as_array()
                            .ok_or_else(|| invalid(format!("$in on {field} must be an array")))?
                            .clone(),
                    ),
                    other => return Err(invalid(format!("unsupported operator {other}"))),
                };
                predicates.push((field.clone(), predicate));
            }
        }

        let mut sort = Vec::new();
        if let Some(entries) = doc.get("sort") {
            let entries = entries
                .as_array()
                .ok_or_else(|| invalid("sort must be an array".into()))?;
            for entry in entries {
                let entry = entry
                    .as_object()
                    .ok_or_else(|| invalid("sort entries must be objects".into()))?;
                for (field, direction) in entry {
                    let descending = match direction.as_str() {
                        Some("asc") => false,
                        Some("desc") => true,
                        _ => return Err(invalid(format!("bad sort direction for {field}"))),
                    };
                    sort.push((field.clone(), descending));
                }
            }
        }

        let index = match doc.get("use_index") {
            None => None,
            Some(Value::Array(parts)) => match parts.as_slice() {
                [Value::String(design_doc), Value::String(name)] => {
                    Some((design_doc.clone(), name.clone()))
                }
                _ => return Err(invalid("use_index must be [designDoc, indexName]".into())),
            },
            Some(_) => return Err(invalid("use_index must be an array".into())),
        };

        Ok(Self {
            selector: predicates,
            sort,
            index,
        })
    }

    fn matches(&self, doc: &Value) -> bool {
        self.selector
            .iter()
            .all(|(field, predicate)| predicate.test(doc.get(field)))
    }

    fn compare(&self, a: &Value, b: &Value) -> CmpOrdering {
        for (field, descending) in &self.sort {
            let ord = sort_key(a.get(field)).cmp(&sort_key(b.get(field)));
            let ord = if *descending { ord.reverse() } else { ord };
            if ord != CmpOrdering::Equal {
                return ord;
            }
        }
        CmpOrdering::Equal
    }
}

fn sort_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        ledger.seed("S1", r#"{"stockId":"S1","shopId":"222","kindName":"apple","storageTime":"1"}"#);
        ledger.seed("S2", r#"{"stockId":"S2","shopId":"222","kindName":"green apple","storageTime":"3"}"#);
        ledger.seed("S3", r#"{"stockId":"S3","shopId":"333","kindName":"pear","storageTime":"2"}"#);
        ledger.seed("raw", "not json");
        ledger
    }

    fn drain(iter: &mut (dyn StateQueryIterator + '_)) -> Vec<String> {
        let keys = (&mut *iter).map(|kv| kv.unwrap().key).collect();
        iter.close().unwrap();
        keys
    }

    #[test]
    fn test_eq_regex_and_sort() {
        let ledger = seeded();
        let tx = ledger.begin("tx1");
        let query = r#"{"selector":{"kindName":{"$regex":"apple"},"shopId":{"$eq":"222"}},"sort":[{"storageTime":"desc"}]}"#;
        let mut iter = tx.get_query_result(query).unwrap();
        assert_eq!(drain(iter.as_mut()), vec!["S2", "S1"]);
    }

    #[test]
    fn test_in_operator() {
        let ledger = seeded();
        let tx = ledger.begin("tx1");
        let query = r#"{"selector":{"shopId":{"$in":["333"]}}}"#;
        let mut iter = tx.get_query_result(query).unwrap();
        assert_eq!(drain(iter.as_mut()), vec!["S3"]);
    }

    #[test]
    fn test_pagination_walks_all_pages() {
        let ledger = seeded();
        let tx = ledger.begin("tx1");
        let query = r#"{"selector":{},"sort":[{"storageTime":"asc"}]}"#;

        let (mut iter, meta) = tx.get_query_result_with_pagination(query, 2, "").unwrap();
        assert_eq!(drain(iter.as_mut()), vec!["S1", "S3"]);
        assert_eq!(meta.bookmark, "S3");

        let (mut iter, meta) = tx.get_query_result_with_pagination(query, 2, &meta.bookmark).unwrap();
        assert_eq!(drain(iter.as_mut()), vec!["S2"]);
        assert_eq!(meta.fetched_count, 1);

        let (mut iter, last) = tx.get_query_result_with_pagination(query, 2, &meta.bookmark).unwrap();
        assert!(drain(iter.as_mut()).is_empty());
        assert_eq!(last.bookmark, meta.bookmark);
    }

    #[test]
    fn test_rejects_bad_page_size_and_bookmark() {
        let ledger = seeded();
        let tx = ledger.begin("tx1");
        let query = r#"{"selector":{}}"#;
        assert_eq!(
            tx.get_query_result_with_pagination(query, 0, "").err(),
            Some(StoreError::InvalidPageSize(0))
        );
        assert!(matches!(
            tx.get_query_result_with_pagination(query, 5, "nope").err(),
            Some(StoreError::InvalidBookmark(_))
        ));
    }

    #[test]
    fn test_unknown_index_hint_is_rejected_when_indexes_registered() {
        let ledger = seeded().with_index("_design/goodsShopIdDoc", "goodsShopId");
        let tx = ledger.begin("tx1");
        let ok = r#"{"selector":{},"use_index":["_design/goodsShopIdDoc","goodsShopId"]}"#;
        let bad = r#"{"selector":{},"use_index":["_design/other","other"]}"#;
        let mut iter = tx.get_query_result(ok).unwrap();
        iter.close().unwrap();
        assert!(matches!(tx.get_query_result(bad).err(), Some(StoreError::InvalidQuery(_))));
    }

    #[test]
    fn test_writes_are_buffered_until_commit() {
        let mut ledger = MemoryLedger::new();
        let writes = {
            let mut tx = ledger.begin("tx1");
            tx.put_state("k", b"v".to_vec()).unwrap();
            assert_eq!(tx.get_state("k").unwrap(), None);
            tx.into_writes()
        };
        assert_eq!(ledger.commit(writes), 1);
        assert_eq!(ledger.get("k"), Some(&b"v"[..]));
    }

    #[test]
    fn test_iterator_tracker_tracks_open_handles() {
        let ledger = seeded();
        let tracker = ledger.iterator_tracker();
        let tx = ledger.begin("tx1");
        let mut iter = tx.get_query_result(r#"{"selector":{}}"#).unwrap();
        assert_eq!(tracker.open_count(), 1);
        iter.close().unwrap();
        iter.close().unwrap();
        assert_eq!(tracker.open_count(), 0);
    }
}
