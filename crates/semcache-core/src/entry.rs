use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A restricted metadata value: strings, numbers, and booleans only.
///
/// Per the specification's design notes, invalidation compares metadata by
/// equality; supporting arbitrary nested containers would make that equality
/// ill-defined, so the value type is a closed sum type instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::Number(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

pub type Metadata = HashMap<String, MetadataValue>;

/// A single cached query/response pair.
///
/// Immutable after creation except for `last_accessed_at` and
/// `access_count`, both of which only change via `touch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub query: String,
    pub response: String,
    pub embedding: Vec<f64>,
    pub metadata: Metadata,
    pub created_at: SystemTime,
    pub last_accessed_at: SystemTime,
    pub access_count: u64,
}

impl Entry {
    pub fn new(
        id: String,
        query: String,
        response: String,
        embedding: Vec<f64>,
        metadata: Metadata,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            query,
            response,
            embedding,
            metadata,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
        }
    }

    /// Record a successful lookup: bump the access counter and refresh the
    /// last-accessed timestamp. Does not touch any other field.
    pub fn touch(&mut self) {
        self.last_accessed_at = SystemTime::now();
        self.access_count += 1;
    }
}
