//! Global module status settings

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::config::repository::settings::{get_setting, set_setting};

/// Settings key holding every module's status
const MODULES_STATUS_KEY: &str = "global_modules_status";

/// Key/value settings storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSettingsStore { pool }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        get_setting(&self.pool, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        set_setting(&self.pool, key, value).await
    }
}

/// Settings held in memory
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<BTreeMap<String, String>>,
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| anyhow!("Settings lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("Settings lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Invalid settings update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    InvalidModule { key: String, status: String },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidModule { key, status } => write!(
                f,
                "Status update failed: not a valid module or status (module '{}', status '{}')",
                key, status
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Enables and disables global modules (integrations)
pub struct ModuleStatusService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> ModuleStatusService<S> {
    pub fn new(store: S) -> Self {
        ModuleStatusService { store }
    }

    /// All module statuses, keyed by module
    pub async fn statuses(&self) -> Result<BTreeMap<String, String>> {
        let Some(raw) = self.store.get(MODULES_STATUS_KEY).await? else {
            return Ok(BTreeMap::new());
        };

        // Anything but an object counts as no modules configured
        match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(modules) => Ok(modules),
            Err(e) => {
                log::warn!("Ignoring unreadable module statuses: {}", e);
                Ok(BTreeMap::new())
            }
        }
    }

    /// A module is enabled only when its status is exactly `yes`
    pub async fn is_enabled(&self, key: &str) -> Result<bool> {
        Ok(self
            .statuses()
            .await?
            .get(key)
            .is_some_and(|status| status == "yes"))
    }

    /// Set a module's status to `yes` or `no`
    pub async fn update_module_status(&self, key: &str, status: &str) -> Result<()> {
        let key = key.trim();
        let status = status.trim();

        if key.is_empty() || !matches!(status, "yes" | "no") {
            return Err(ConfigurationError::InvalidModule {
                key: key.to_string(),
                status: status.to_string(),
            }
            .into());
        }

        let mut modules = self.statuses().await?;
        modules.insert(key.to_string(), status.to_string());

        let encoded = serde_json::to_string(&modules).context("Failed to encode module statuses")?;
        self.store.set(MODULES_STATUS_KEY, &encoded).await?;

        log::info!("Module '{}' set to '{}'", key, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::connect_memory;

    fn service() -> ModuleStatusService<MemorySettingsStore> {
        ModuleStatusService::new(MemorySettingsStore::default())
    }

    #[tokio::test]
    async fn test_unknown_module_disabled() {
        assert!(!service().is_enabled("mailchimp").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = service();

        service.update_module_status("mailchimp", "yes").await.unwrap();
        service.update_module_status("slack", "no").await.unwrap();
        assert!(service.is_enabled("mailchimp").await.unwrap());
        assert!(!service.is_enabled("slack").await.unwrap());

        service.update_module_status("mailchimp", "no").await.unwrap();
        assert!(!service.is_enabled("mailchimp").await.unwrap());
        assert_eq!(service.statuses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_updates_rejected() {
        let service = service();

        for (key, status) in [("", "yes"), ("mailchimp", "maybe"), ("mailchimp", "YES")] {
            let err = service.update_module_status(key, status).await.unwrap_err();
            assert!(err.downcast_ref::<ConfigurationError>().is_some());
        }
        assert!(service.statuses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_statuses() {
        let store = MemorySettingsStore::default();
        store.set(MODULES_STATUS_KEY, "not json").await.unwrap();
        let service = ModuleStatusService::new(store);
        assert!(!service.is_enabled("mailchimp").await.unwrap());
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let pool = connect_memory().await.unwrap();
        let service = ModuleStatusService::new(SqliteSettingsStore::new(pool));

        service.update_module_status("webhook", "yes").await.unwrap();
        assert!(service.is_enabled("webhook").await.unwrap());
    }
}
