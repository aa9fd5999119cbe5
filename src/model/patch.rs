//! # Patch Merger
//!
//! A patch is a sparse `field -> value` document. Merging walks the record's
//! field table and overwrites exactly the fields the patch names. Keys that are
//! not declared on the record are ignored.
//!
//! Presence is what matters: an omitted field keeps its value, an explicit empty
//! string clears it.

use super::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Sparse update document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(BTreeMap<String, String>);

impl PatchDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat JSON object of string values.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PatchDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Applies `patch` in place. Returns the number of fields written.
pub fn apply<R: Record>(record: &mut R, patch: &PatchDocument) -> usize {
    let mut applied = 0;
    for field in R::FIELDS {
        if let Some(value) = patch.get(field.name) {
            *(field.slot)(record) = value.to_string();
            applied += 1;
        }
    }
    if applied < patch.len() {
        let ignored: Vec<&str> = patch
            .keys()
            .filter(|key| R::FIELDS.iter().all(|field| field.name != *key))
            .collect();
        debug!(kind = R::KIND, ?ignored, "Ignoring undeclared patch keys");
    }
    applied
}

/// Returns a copy of `current` with `patch` applied.
pub fn merge<R: Record>(current: &R, patch: &PatchDocument) -> R {
    let mut next = current.clone();
    apply(&mut next, patch);
    next
}
