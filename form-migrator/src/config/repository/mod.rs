//! Repository layer for database operations

pub mod entries;
pub mod forms;
pub mod settings;

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::migrator::store::{DestinationStore, ImportLog, SourceLink};
use crate::migrator::types::{DestinationForm, Entry, FormMeta};

/// Open (creating if needed) the destination database and apply migrations
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    migrate(&pool).await?;
    log::debug!("Connected to destination database {}", path.display());

    Ok(pool)
}

/// Private in-memory database, one connection kept alive for the pool's lifetime
#[cfg(test)]
pub async fn connect_memory() -> Result<SqlitePool> {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .context("Invalid in-memory database URL")?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to open in-memory database")?;

    migrate(&pool).await?;

    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Destination store backed by the SQLite repository
#[derive(Debug, Clone)]
pub struct SqliteDestinationStore {
    pool: SqlitePool,
}

impl SqliteDestinationStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteDestinationStore { pool }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DestinationStore for SqliteDestinationStore {
    async fn create_form(&self, title: &str, link: &SourceLink) -> Result<i64> {
        forms::create_form(&self.pool, title, link).await
    }

    async fn attach_fields(&self, form_id: i64, form: &DestinationForm) -> Result<()> {
        let document =
            serde_json::to_string(&form.to_json()).context("Failed to encode form fields")?;
        forms::update_form_fields(&self.pool, form_id, &form.title, &document).await
    }

    async fn attach_metadata(&self, form_id: i64, meta: &FormMeta) -> Result<()> {
        forms::replace_form_meta(&self.pool, form_id, meta).await
    }

    async fn upsert_entry(&self, form_id: i64, entry: &Entry) -> Result<i64> {
        entries::upsert_entry(&self.pool, form_id, entry).await
    }

    async fn find_form_by_source_id(&self, link: &SourceLink) -> Result<Option<i64>> {
        forms::find_form_by_source(&self.pool, link).await
    }

    async fn record_log(&self, log: &ImportLog) -> Result<()> {
        forms::insert_log(&self.pool, log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrator::store::LogStatus;
    use crate::migrator::translate::FormTranslator;
    use crate::migrator::types::{EntryValue, FormDefaults, SourceField, SourceForm};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn link(id: &str) -> SourceLink {
        SourceLink {
            source_key: "wpforms".into(),
            source_id: id.into(),
        }
    }

    fn translated() -> crate::migrator::translate::FormTranslation {
        let form = SourceForm::new(
            "7",
            "Contact",
            vec![
                SourceField::new("1", "email", json!({"label": "Email"})),
                SourceField::new("2", "checkbox", json!({"choices": {"1": {"label": "A"}}})),
            ],
        )
        .with_settings(json!({
            "confirmations": {
                "1": {"type": "message", "name": "First"},
                "2": {"type": "redirect", "name": "Second", "redirect": "https://example.com"}
            }
        }));

        FormTranslator::new(false)
            .with_stamp(5)
            .with_defaults(FormDefaults::default())
            .translate(&form)
            .unwrap()
    }

    #[tokio::test]
    async fn test_form_roundtrip() {
        let store = SqliteDestinationStore::new(connect_memory().await.unwrap());
        let translation = translated();

        assert_eq!(store.find_form_by_source_id(&link("7")).await.unwrap(), None);

        let id = store.create_form("Contact", &link("7")).await.unwrap();
        store.attach_fields(id, translation.form()).await.unwrap();
        store.attach_metadata(id, &translation.meta).await.unwrap();

        assert_eq!(store.find_form_by_source_id(&link("7")).await.unwrap(), Some(id));

        let row = forms::get_form(store.pool(), id).await.unwrap().unwrap();
        assert_eq!(row.title, "Contact");
        assert_eq!(row.source_id, "7");
        let document: serde_json::Value =
            serde_json::from_str(row.form_fields.as_deref().unwrap()).unwrap();
        assert_eq!(document["fields"][0]["attributes"]["name"], "email_1");
    }

    #[tokio::test]
    async fn test_meta_rows_replaced() {
        let store = SqliteDestinationStore::new(connect_memory().await.unwrap());
        let translation = translated();
        let id = store.create_form("Contact", &link("7")).await.unwrap();

        store.attach_metadata(id, &translation.meta).await.unwrap();
        store.attach_metadata(id, &translation.meta).await.unwrap();

        let rows = forms::list_form_meta(store.pool(), id).await.unwrap();
        let keys: Vec<_> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "formSettings",
                "advancedValidationSettings",
                "delete_entry_on_submission",
                "notifications",
                "notifications",
                "confirmations",
            ]
        );
        assert_eq!(rows[2].1, "no");
    }

    #[tokio::test]
    async fn test_entries_and_logs() {
        let store = SqliteDestinationStore::new(connect_memory().await.unwrap());
        let id = store.create_form("Contact", &link("7")).await.unwrap();

        let mut entry = Entry {
            source_id: "31".into(),
            created_at: Some("2024-01-01 10:00:00".into()),
            ..Default::default()
        };
        entry.response.insert("email_1".into(), EntryValue::from("a@example.com"));
        entry
            .response
            .insert("checkbox_2".into(), EntryValue::List(vec!["A".into()]));

        store.upsert_entry(id, &entry).await.unwrap();
        assert_eq!(entries::count_entries(store.pool(), id).await.unwrap(), 1);

        let stored = entries::list_entries(store.pool(), id).await.unwrap();
        assert_eq!(stored[0].response, entry.response);
        assert_eq!(stored[0].created_at.as_deref(), Some("2024-01-01 10:00:00"));
        assert!(stored[0].updated_at.is_some());

        store
            .record_log(&ImportLog {
                parent_source_id: Some(id),
                source_type: "WP Forms".into(),
                component: "Migrator".into(),
                status: LogStatus::Success,
                title: "Contact".into(),
                description: "imported".into(),
            })
            .await
            .unwrap();
        let logs = forms::list_logs(store.pool()).await.unwrap();
        assert_eq!(
            logs,
            vec![(
                String::from("success"),
                String::from("Contact"),
                String::from("imported")
            )]
        );
    }

    #[tokio::test]
    async fn test_entry_upsert_rewrites_same_submission() {
        let store = SqliteDestinationStore::new(connect_memory().await.unwrap());
        let id = store.create_form("Contact", &link("7")).await.unwrap();

        let mut entry = Entry {
            source_id: "31".into(),
            ..Default::default()
        };
        entry.response.insert("email_1".into(), EntryValue::from("old@example.com"));
        let first = store.upsert_entry(id, &entry).await.unwrap();

        entry.response.insert("email_1".into(), EntryValue::from("new@example.com"));
        let second = store.upsert_entry(id, &entry).await.unwrap();
        assert_eq!(first, second);

        let other = Entry {
            source_id: "32".into(),
            ..Default::default()
        };
        store.upsert_entry(id, &other).await.unwrap();

        let stored = entries::list_entries(store.pool(), id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].response["email_1"], EntryValue::from("new@example.com"));
    }

    #[tokio::test]
    async fn test_settings() {
        let pool = connect_memory().await.unwrap();
        assert_eq!(settings::get_setting(&pool, "k").await.unwrap(), None);
        settings::set_setting(&pool, "k", "a").await.unwrap();
        settings::set_setting(&pool, "k", "b").await.unwrap();
        assert_eq!(settings::get_setting(&pool, "k").await.unwrap().as_deref(), Some("b"));
    }
}
