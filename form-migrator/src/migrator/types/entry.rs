//! Destination entries

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A submitted value after reshaping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Text(String),
    List(Vec<String>),
    /// Composite values (name parts, address lines), in sub-field order
    Fields(IndexMap<String, String>),
}

impl EntryValue {
    #[cfg(test)]
    pub fn as_fields(&self) -> Option<&IndexMap<String, String>> {
        match self {
            EntryValue::Fields(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<&str> for EntryValue {
    fn from(s: &str) -> Self {
        EntryValue::Text(s.to_string())
    }
}

/// A destination entry keyed by destination field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Source entry id
    #[serde(skip)]
    pub source_id: String,
    pub response: IndexMap<String, EntryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entry {
    pub fn get(&self, name: &str) -> Option<&EntryValue> {
        self.response.get(name)
    }
}
