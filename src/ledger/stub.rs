//! # Ledger Stub Interface
//!
//! The surface a contract sees of the ledger it runs on. A stub is scoped to one
//! invocation: it carries the transaction id, reads committed state, buffers writes
//! and hands out query iterators over the document index.

use thiserror::Error;

/// Errors raised by the ledger or its document index.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The backing store failed to read or write.
    #[error("ledger backend error: {0}")]
    Backend(String),

    /// The query document could not be parsed or uses an unsupported operator.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Page sizes must be positive.
    #[error("invalid page size: {0}")]
    InvalidPageSize(i32),

    /// The bookmark does not point into the result set of this query.
    #[error("invalid bookmark: {0}")]
    InvalidBookmark(String),

    /// The result iterator failed mid-stream.
    #[error("query iterator error: {0}")]
    Iterator(String),
}

/// A single entry yielded by a query iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Pagination metadata returned alongside a paged result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMetadata {
    /// Opaque continuation token; pass back verbatim to fetch the next page.
    pub bookmark: String,
    /// Number of records in this page.
    pub fetched_count: usize,
}

/// Forward-only result stream over the document index.
///
/// Handles are a resource of the index engine and must be released with
/// [`StateQueryIterator::close`]. Dropping an iterator without closing it leaks
/// the handle.
pub trait StateQueryIterator: Iterator<Item = Result<KeyValue, StoreError>> + Send {
    fn close(&mut self) -> Result<(), StoreError>;
}

/// Transaction context handed to every contract invocation.
pub trait ChaincodeStub: Send + Sync {
    /// Identifier of the transaction this invocation runs in.
    fn tx_id(&self) -> &str;

    /// Reads the committed value for `key`. `Ok(None)` means the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Buffers a write; it becomes visible once the transaction commits.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Runs a rich query and streams every match.
    fn get_query_result(
        &self,
        query: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, StoreError>;

    /// Runs a rich query and streams at most `page_size` matches after `bookmark`.
    fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(Box<dyn StateQueryIterator + '_>, QueryMetadata), StoreError>;
}
