//! Rich query construction and paginated result streaming.

pub mod builder;
pub mod cursor;

pub use builder::{build_query, Condition, IndexHint, QueryBuilder, QueryDocument, SortDirection};
pub use cursor::{raw_document, Page, QueryCursor};
