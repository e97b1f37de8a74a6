//! Source store backed by a JSON export of the WPForms tables
//!
//! The export holds the plugin version (absent when the plugin is not
//! installed), the form posts and the stored entries:
//!
//! ```json
//! {
//!   "version": "1.8.7",
//!   "forms": [{"ID": 12, "post_title": "Contact", "post_content": "{\"fields\":{...}}"}],
//!   "entries": [{"entry_id": 1, "form_id": 12, "fields": "{...}", "date": "2024-01-01 10:00:00"}]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::migrator::store::SourceStore;
use crate::migrator::translate::path::{is_filled, scalar_string};
use crate::migrator::types::{RawSubmission, SourceForm};

#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    forms: Vec<ExportForm>,
    #[serde(default)]
    entries: Vec<ExportEntry>,
}

#[derive(Debug, Deserialize)]
struct ExportForm {
    #[serde(rename = "ID", deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    post_title: String,
    /// JSON string as stored in the posts table; an inline object is accepted too
    #[serde(default)]
    post_content: Value,
}

#[derive(Debug, Deserialize)]
struct ExportEntry {
    #[serde(deserialize_with = "id_string")]
    entry_id: String,
    #[serde(deserialize_with = "id_string")]
    form_id: String,
    #[serde(default)]
    fields: Value,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    date_modified: Option<String>,
}

/// Ids are numbers in database dumps and strings in hand-written exports
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_string(&value)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", value)))
}

fn encoded(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// WPForms data loaded from an export file
#[derive(Debug, Clone, Default)]
pub struct ExportSourceStore {
    version: Option<String>,
    forms: Vec<SourceForm>,
    entries: Vec<RawSubmission>,
}

impl ExportSourceStore {
    /// Read an export file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source export: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse source export: {}", path.display()))
    }

    /// Parse an export document
    pub fn from_json(content: &str) -> Result<Self> {
        let file: ExportFile =
            serde_json::from_str(content).context("Export is not a valid WPForms export")?;

        let version = file
            .version
            .filter(is_filled)
            .as_ref()
            .and_then(scalar_string);

        let mut forms = Vec::with_capacity(file.forms.len());
        for form in file.forms {
            let content = encoded(form.post_content);
            match SourceForm::from_post(form.id.clone(), form.post_title, &content) {
                Ok(parsed) => forms.push(parsed),
                Err(e) => log::warn!("Skipping source form {}: invalid post content: {}", form.id, e),
            }
        }

        let entries = file
            .entries
            .into_iter()
            .map(|entry| RawSubmission {
                entry_id: entry.entry_id,
                form_id: entry.form_id,
                fields: encoded(entry.fields),
                date: entry.date,
                date_modified: entry.date_modified,
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Loaded source export: version {:?}, {} forms, {} entries",
            version,
            forms.len(),
            entries.len()
        );

        Ok(ExportSourceStore {
            version,
            forms,
            entries,
        })
    }

    #[cfg(test)]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

#[async_trait]
impl SourceStore for ExportSourceStore {
    async fn is_installed(&self) -> Result<bool> {
        Ok(self.version.is_some())
    }

    async fn list_forms(&self) -> Result<Vec<SourceForm>> {
        Ok(self.forms.clone())
    }

    async fn get_form(&self, id: &str) -> Result<Option<SourceForm>> {
        Ok(self.forms.iter().find(|form| form.id == id).cloned())
    }

    async fn count_entries(&self, form_id: &str) -> Result<usize> {
        Ok(self.entries.iter().filter(|e| e.form_id == form_id).count())
    }

    async fn list_entries(&self, form_id: &str, limit: usize) -> Result<Vec<RawSubmission>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.form_id == form_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export() -> String {
        json!({
            "version": "1.8.7",
            "forms": [
                {
                    "ID": 12,
                    "post_title": "Contact",
                    "post_content": json!({
                        "fields": {
                            "1": {"id": "1", "type": "name", "format": "simple"},
                            "2": {"id": "2", "type": "email"}
                        },
                        "settings": {"submit_text": "Send"}
                    }).to_string()
                },
                {"ID": "13", "post_title": "Broken", "post_content": "{oops"}
            ],
            "entries": [
                {"entry_id": 1, "form_id": 12, "fields": "{\"2\":{\"value\":\"a@example.com\"}}", "date": "2024-01-01 10:00:00"},
                {"entry_id": 2, "form_id": 12, "fields": {"2": {"value": "b@example.com"}}},
                {"entry_id": 3, "form_id": 99, "fields": "{}"}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_loads_forms_and_entries() {
        let store = ExportSourceStore::from_json(&export()).unwrap();

        assert!(store.is_installed().await.unwrap());
        assert_eq!(store.version(), Some("1.8.7"));

        // The broken form is skipped
        let forms = store.list_forms().await.unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].id, "12");
        assert_eq!(forms[0].fields.len(), 2);

        assert_eq!(store.count_entries("12").await.unwrap(), 2);
        let entries = store.list_entries("12", 1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_id, "1");

        let second = &store.list_entries("12", 10).await.unwrap()[1];
        let payload: Value = serde_json::from_str(&second.fields).unwrap();
        assert_eq!(payload["2"]["value"], "b@example.com");
    }

    #[tokio::test]
    async fn test_missing_version_means_not_installed() {
        let store = ExportSourceStore::from_json(r#"{"forms": []}"#).unwrap();
        assert!(!store.is_installed().await.unwrap());

        let store = ExportSourceStore::from_json(r#"{"version": ""}"#).unwrap();
        assert!(!store.is_installed().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_form_by_id() {
        let store = ExportSourceStore::from_json(&export()).unwrap();
        assert!(store.get_form("12").await.unwrap().is_some());
        assert!(store.get_form("404").await.unwrap().is_none());
    }
}
