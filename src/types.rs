//! Typed views over OpenAlex list and group responses.
//!
//! The client yields raw `serde_json::Value` pages; these types are an opt-in
//! way to read the envelope. Entity objects stay untyped.

use crate::error::{OpenAlexError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `meta` object of list and group responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of matching entities.
    pub count: Option<u64>,
    pub db_response_time_ms: Option<u64>,
    /// Set for basic paging.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Set for cursor paging; `None` on the last page.
    pub next_cursor: Option<String>,
    pub groups_count: Option<u64>,
}

/// One page of a list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage {
    pub meta: Meta,
    #[serde(default)]
    pub results: Vec<Value>,
}

/// One bucket of a group_by response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBucket {
    #[serde(deserialize_with = "deserialize_key")]
    pub key: String,
    pub key_display_name: Option<String>,
    pub count: u64,
}

/// A group_by response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsPage {
    #[serde(default)]
    pub meta: Meta,
    pub group_by: Vec<GroupBucket>,
}

impl ListPage {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| OpenAlexError::Parse(format!("Invalid list page: {}", e)))
    }

    /// Whether this is a final, empty cursor page.
    pub fn is_exhausted(&self) -> bool {
        self.results.is_empty() && self.meta.next_cursor.is_none()
    }
}

impl GroupsPage {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| OpenAlexError::Parse(format!("Invalid group_by response: {}", e)))
    }
}

/// Group keys come back as strings, numbers or booleans depending on the attribute.
fn deserialize_key<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
