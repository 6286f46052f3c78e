//! Wire types of the node's query API.

use serde::{Deserialize, Serialize};

/// Value of a data entry.
///
/// The node tags entries with a `type` field; the value itself is a JSON
/// number, boolean or string depending on that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
}

/// One key/value entry of an account's data storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
    pub key: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: EntryValue,
}

impl DataEntry {
    /// Create a string entry.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: Some("string".to_string()),
            value: EntryValue::Text(value.into()),
        }
    }

    /// Create an integer entry.
    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            kind: Some("integer".to_string()),
            value: EntryValue::Integer(value),
        }
    }

    /// The value as text, if it is a string entry.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            EntryValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as an integer.
    ///
    /// String entries holding a decimal number are accepted as well.
    pub fn as_integer(&self) -> Option<i64> {
        match &self.value {
            EntryValue::Integer(value) => Some(*value),
            EntryValue::Text(text) => text.trim().parse().ok(),
            EntryValue::Boolean(_) => None,
        }
    }
}

/// Response from `/addresses/balance/{address}` and
/// `/assets/balance/{address}/{assetId}`.
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub address: String,
    #[serde(default, rename = "assetId")]
    pub asset_id: Option<String>,
    pub balance: u64,
}
