use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A movie as returned by the upstream catalog
///
/// Upstream fields are kept verbatim; the gateway only reads `id`,
/// `poster_path` and `original_language`, and adds `poster_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord(Map<String, Value>);

impl MovieRecord {
    /// Reads a record out of an arbitrary JSON value; non-objects yield `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Upstream catalog id, the dedup key
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    /// Poster path, treated as absent when missing, null, non-string or empty
    pub fn poster_path(&self) -> Option<&str> {
        self.0
            .get("poster_path")
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.0.get("poster_url").and_then(Value::as_str)
    }

    pub fn original_language(&self) -> Option<&str> {
        self.0.get("original_language").and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Extracts the `results` array of a listing response
///
/// A missing or non-array `results` field is treated as an empty listing.
pub fn records_from_listing(document: &Value) -> Vec<MovieRecord> {
    document
        .get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .cloned()
                .filter_map(MovieRecord::from_value)
                .collect()
        })
        .unwrap_or_default()
}
