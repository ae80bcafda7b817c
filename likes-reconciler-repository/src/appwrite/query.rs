//! Appwrite list query encoding.
//!
//! List endpoints take repeated `queries[]` parameters, each a JSON object
//! describing one filter or modifier.

use serde::Serialize;
use serde_json::Value;

/// A single Appwrite query.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    /// Match documents whose `attribute` equals `value`.
    pub fn equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.into()),
            values: vec![Value::String(value.into())],
        }
    }

    /// Cap the number of returned documents.
    pub fn limit(limit: usize) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![Value::from(limit)],
        }
    }

    /// Encode as the string sent in a `queries[]` parameter.
    pub fn encode(&self) -> String {
        // Serializing a struct of strings and numbers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
