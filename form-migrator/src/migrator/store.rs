//! Collaborator interfaces for reading source data and writing destination data

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::migrator::types::{DestinationForm, Entry, FormMeta, RawSubmission, SourceForm};

/// Read-only access to the source plugin's forms and entries
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Whether the source plugin is installed and active
    async fn is_installed(&self) -> Result<bool>;

    async fn list_forms(&self) -> Result<Vec<SourceForm>>;

    async fn get_form(&self, id: &str) -> Result<Option<SourceForm>>;

    async fn count_entries(&self, form_id: &str) -> Result<usize>;

    /// Up to `limit` stored submissions of a form, oldest first
    async fn list_entries(&self, form_id: &str, limit: usize) -> Result<Vec<RawSubmission>>;
}

/// Link from a destination form back to the source form it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    /// Source plugin key, e.g. `wpforms`
    pub source_key: String,
    pub source_id: String,
}

/// Outcome of an import, as written to the destination log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Failed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
        }
    }
}

/// One row of the destination's import log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLog {
    /// Destination form id, when one exists
    pub parent_source_id: Option<i64>,
    /// Human readable source name, e.g. `WP Forms`
    pub source_type: String,
    pub component: String,
    pub status: LogStatus,
    pub title: String,
    pub description: String,
}

/// Write access to the destination plugin
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Create an empty form linked to its source; returns the new form id
    async fn create_form(&self, title: &str, link: &SourceLink) -> Result<i64>;

    /// Replace the form's title and field schema
    async fn attach_fields(&self, form_id: i64, form: &DestinationForm) -> Result<()>;

    /// Replace the form's metadata rows
    async fn attach_metadata(&self, form_id: i64, meta: &FormMeta) -> Result<()>;

    /// Store one entry, replacing the form's entry with the same source id;
    /// returns the entry id
    async fn upsert_entry(&self, form_id: i64, entry: &Entry) -> Result<i64>;

    /// Destination form imported from this source form, if any
    async fn find_form_by_source_id(&self, link: &SourceLink) -> Result<Option<i64>>;

    async fn record_log(&self, log: &ImportLog) -> Result<()>;
}
