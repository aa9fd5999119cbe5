//! # Paginated Cursor
//!
//! [`QueryCursor`] owns the index engine's result handle for the duration of one
//! operation. It yields at most `page_size` entries and releases the handle as
//! soon as the stream ends, fails, or the cursor is dropped, whichever happens
//! first.
//!
//! [`Page`] is the response envelope: `{"data": [...], "bookmark": "..."}`.

use crate::framework::ContractError;
use crate::ledger::{ChaincodeStub, KeyValue, StateQueryIterator, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, warn};

/// Forward-only, non-restartable stream over one page of query results.
pub struct QueryCursor<'a> {
    iter: Option<Box<dyn StateQueryIterator + 'a>>,
    remaining: usize,
    bookmark: String,
}

impl<'a> QueryCursor<'a> {
    /// Opens a page of at most `page_size` results starting after `bookmark`.
    pub fn open(
        stub: &'a dyn ChaincodeStub,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<Self, StoreError> {
        let (iter, metadata) = stub.get_query_result_with_pagination(query, page_size, bookmark)?;
        debug!(page_size, fetched = metadata.fetched_count, "Cursor opened");
        Ok(Self {
            iter: Some(iter),
            remaining: usize::try_from(page_size).unwrap_or(0),
            bookmark: metadata.bookmark,
        })
    }

    /// Opens an unpaginated stream over every match.
    pub fn open_all(stub: &'a dyn ChaincodeStub, query: &str) -> Result<Self, StoreError> {
        let iter = stub.get_query_result(query)?;
        Ok(Self {
            iter: Some(iter),
            remaining: usize::MAX,
            bookmark: String::new(),
        })
    }

    /// Continuation token to pass back verbatim for the next page.
    pub fn bookmark(&self) -> &str {
        &self.bookmark
    }

    /// Releases the result handle, reporting a failure to do so.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.release()
    }

    /// Drains the cursor into a page, decoding each entry with `decode`.
    pub fn into_page<T, F>(mut self, mut decode: F) -> Result<Page<T>, ContractError>
    where
        F: FnMut(KeyValue) -> Result<T, ContractError>,
    {
        let mut data = Vec::new();
        for entry in self.by_ref() {
            data.push(decode(entry?)?);
        }
        let bookmark = std::mem::take(&mut self.bookmark);
        self.release()?;
        Ok(Page { data, bookmark })
    }

    fn release(&mut self) -> Result<(), StoreError> {
        match self.iter.take() {
            Some(mut iter) => iter.close(),
            None => Ok(()),
        }
    }

    fn release_quietly(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "Failed to close query iterator");
        }
    }
}

impl Iterator for QueryCursor<'_> {
    type Item = Result<KeyValue, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            self.release_quietly();
            return None;
        }
        let item = self.iter.as_mut()?.next();
        match &item {
            Some(Ok(_)) => self.remaining -= 1,
            Some(Err(_)) | None => self.release_quietly(),
        }
        item
    }
}

impl Drop for QueryCursor<'_> {
    fn drop(&mut self) {
        self.release_quietly();
    }
}

/// A page of results plus the bookmark for the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub bookmark: String,
}

impl<T: Serialize> Page<T> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Embeds a stored value as-is, without re-encoding it.
pub fn raw_document(entry: KeyValue) -> Result<Box<RawValue>, ContractError> {
    Ok(serde_json::from_slice(&entry.value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn ledger() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        for (key, time) in [("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")] {
            ledger.seed(key, format!(r#"{{"id":"{key}","time":"{time}"}}"#));
        }
        ledger
    }

    const QUERY: &str = r#"{"selector":{},"sort":[{"time":"desc"}]}"#;

    #[test]
    fn test_walking_bookmarks_yields_everything_once() {
        let ledger = ledger();
        let tracker = ledger.iterator_tracker();
        let tx = ledger.begin("tx1");

        let mut seen = Vec::new();
        let mut bookmark = String::new();
        loop {
            let page = QueryCursor::open(&tx, QUERY, 2, &bookmark)
                .unwrap()
                .into_page(|kv| Ok(kv.key))
                .unwrap();
            if page.data.is_empty() {
                break;
            }
            seen.extend(page.data);
            bookmark = page.bookmark;
        }
        assert_eq!(seen, vec!["E", "D", "C", "B", "A"]);
        assert_eq!(tracker.open_count(), 0);
    }

    #[test]
    fn test_early_drop_releases_handle() {
        let ledger = ledger();
        let tracker = ledger.iterator_tracker();
        let tx = ledger.begin("tx1");
        {
            let mut cursor = QueryCursor::open_all(&tx, QUERY).unwrap();
            assert_eq!(cursor.next().unwrap().unwrap().key, "E");
            assert_eq!(tracker.open_count(), 1);
        }
        assert_eq!(tracker.open_count(), 0);
    }

    #[test]
    fn test_decode_error_releases_handle() {
        let ledger = ledger();
        let tracker = ledger.iterator_tracker();
        let tx = ledger.begin("tx1");
        let result: Result<Page<String>, _> = QueryCursor::open(&tx, QUERY, 3, "")
            .unwrap()
            .into_page(|_| Err(ContractError::Validation("boom".into())));
        assert!(result.is_err());
        assert_eq!(tracker.open_count(), 0);
    }

    #[test]
    fn test_page_size_is_enforced_by_the_store() {
        let ledger = ledger();
        let tx = ledger.begin("tx1");
        assert!(matches!(
            QueryCursor::open(&tx, QUERY, -1, "").err(),
            Some(StoreError::InvalidPageSize(-1))
        ));
    }

    #[test]
    fn test_page_envelope_embeds_raw_records() {
        let ledger = ledger();
        let tx = ledger.begin("tx1");
        let page = QueryCursor::open(&tx, QUERY, 1, "")
            .unwrap()
            .into_page(raw_document)
            .unwrap();
        assert_eq!(
            page.to_json().unwrap(),
            r#"{"data":[{"id":"E","time":"5"}],"bookmark":"E"}"#
        );
    }

    #[test]
    fn test_empty_bookmark_is_a_json_string() {
        let page: Page<Box<RawValue>> = Page { data: Vec::new(), bookmark: String::new() };
        let json = page.to_json().unwrap();
        assert_eq!(json, r#"{"data":[],"bookmark":""}"#);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bookmark"], "");
    }
}
