//! # Query Builder
//!
//! Compiles equality, pattern and membership conditions, one sort key and an
//! index hint into a rich query document:
//!
//! ```json
//! {"selector":{"kindName":{"$regex":"name"},"shopId":{"$eq":"222"}},
//!  "sort":[{"storageTime":"desc"}],
//!  "use_index":["_design/goodsDoc","goods"]}
//! ```
//!
//! Selector entries are kept in a sorted map, so the same logical inputs always
//! serialize to the same bytes regardless of the order conditions were added.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Predicate on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    #[serde(rename = "$eq")]
    Eq(String),
    #[serde(rename = "$regex")]
    Regex(String),
    #[serde(rename = "$in")]
    In(Vec<String>),
}

impl Condition {
    fn rank(&self) -> u8 {
        match self {
            Condition::Eq(_) => 2,
            Condition::In(_) => 1,
            Condition::Regex(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Names a precomputed index: `[designDoc, indexName]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexHint(pub &'static str, pub &'static str);

impl IndexHint {
    pub const GOODS_BY_SHOP: IndexHint = IndexHint("_design/goodsShopIdDoc", "goodsShopId");
    pub const GOODS_BY_SHOP_AND_KIND: IndexHint =
        IndexHint("_design/goodsShopIdKindIdDoc", "goodsShopIdKindId");
    pub const GOODS_BY_STORAGE_TIME: IndexHint =
        IndexHint("_design/goodsStorageTimeDoc", "goodsStorageTime");
    pub const ORDERS_BY_BATCH: IndexHint = IndexHint("_design/orderBatchNoDoc", "batchNo");
}

/// A canonical rich query document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDocument {
    selector: BTreeMap<String, Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<BTreeMap<String, SortDirection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_index: Option<IndexHint>,
}

impl QueryDocument {
    pub fn condition(&self, field: &str) -> Option<&Condition> {
        self.selector.get(field)
    }

    pub fn index(&self) -> Option<IndexHint> {
        self.use_index
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Accumulates conditions for a [`QueryDocument`].
///
/// When a field receives more than one condition, equality wins over `$in`,
/// which wins over `$regex`.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    selector: BTreeMap<String, Condition>,
    sort: Option<(String, SortDirection)>,
    index: Option<IndexHint>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_condition(field.into(), Condition::Eq(value.into()))
    }

    pub fn regex(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.with_condition(field.into(), Condition::Regex(pattern.into()))
    }

    pub fn one_of<I, S>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with_condition(field.into(), Condition::In(values))
    }

    /// Sets the sort key, replacing any previous one.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some((field.into(), direction));
        self
    }

    pub fn use_index(mut self, hint: IndexHint) -> Self {
        self.index = Some(hint);
        self
    }

    pub fn build(self) -> QueryDocument {
        QueryDocument {
            selector: self.selector,
            sort: self
                .sort
                .map(|(field, direction)| BTreeMap::from([(field, direction)]))
                .into_iter()
                .collect(),
            use_index: self.index,
        }
    }

    fn with_condition(mut self, field: String, condition: Condition) -> Self {
        if field.is_empty() {
            debug!(?condition, "Dropping condition on empty field name");
            return self;
        }
        match self.selector.get(&field) {
            Some(existing) if existing.rank() > condition.rank() => {
                debug!(field = %field, ?condition, kept = ?existing, "Dropping weaker condition");
            }
            _ => {
                self.selector.insert(field, condition);
            }
        }
        self
    }
}

/// Builds a query from separate equality and pattern maps.
pub fn build_query<E, R, K, V>(
    equality: E,
    regex: R,
    sort: Option<(&str, SortDirection)>,
    index: Option<IndexHint>,
) -> QueryDocument
where
    E: IntoIterator<Item = (K, V)>,
    R: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut builder = QueryBuilder::new();
    for (field, pattern) in regex {
        builder = builder.regex(field, pattern);
    }
    for (field, value) in equality {
        builder = builder.eq(field, value);
    }
    if let Some((field, direction)) = sort {
        builder = builder.sort(field, direction);
    }
    if let Some(hint) = index {
        builder = builder.use_index(hint);
    }
    builder.build()
}
