//! Configuration: `config.toml` plus environment overrides, and the database layer

pub mod repository;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "form-migrator";

/// Environment variables that override the config file
pub const ENV_DATABASE: &str = "FORM_MIGRATOR_DATABASE";
pub const ENV_SOURCE: &str = "FORM_MIGRATOR_SOURCE";
pub const ENV_PRO: &str = "FORM_MIGRATOR_PRO";
pub const ENV_ENTRY_LIMIT: &str = "FORM_MIGRATOR_ENTRY_LIMIT";

/// Upload URL rewrite for migrated file-upload entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Source upload base URL
    pub from: String,
    /// Destination upload base URL
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Destination SQLite database
    pub database: PathBuf,
    /// WPForms JSON export
    pub source: Option<PathBuf>,
    /// Destination pro features (step wrappers)
    pub pro_features: bool,
    /// Overrides the default entry migration limit
    pub entry_limit: Option<usize>,
    pub uploads: Option<UploadsConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: default_database_path(),
            source: None,
            pro_features: false,
            entry_limit: None,
            uploads: None,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("destination.db"))
        .unwrap_or_else(|| PathBuf::from("form-migrator.db"))
}

/// Default location of `config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl Config {
    /// Load from `path` (or the default location), then apply environment overrides
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                log::debug!("Loaded config from {}", path.display());
                Self::from_toml(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?
            }
            _ => Config::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config.toml")
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(database) = lookup(ENV_DATABASE) {
            self.database = PathBuf::from(database);
        }
        if let Some(source) = lookup(ENV_SOURCE) {
            self.source = Some(PathBuf::from(source));
        }
        if let Some(pro) = lookup(ENV_PRO) {
            self.pro_features = matches!(pro.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(limit) = lookup(ENV_ENTRY_LIMIT) {
            let limit = limit
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a number, got '{}'", ENV_ENTRY_LIMIT, limit))?;
            self.entry_limit = Some(limit);
        }

        Ok(())
    }

    /// The source export path, or an error telling how to set it
    pub fn source_path(&self) -> Result<&Path> {
        self.source.as_deref().with_context(|| {
            format!(
                "No source export configured; set `source` in config.toml, {} or --source",
                ENV_SOURCE
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(
            r#"
            database = "/tmp/dest.db"
            source = "/tmp/wpforms.json"
            pro_features = true
            entry_limit = 50

            [uploads]
            from = "https://old.example.com/uploads/"
            to = "https://new.example.com/uploads/"
            "#,
        )
        .unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/dest.db"));
        assert_eq!(config.source, Some(PathBuf::from("/tmp/wpforms.json")));
        assert!(config.pro_features);
        assert_eq!(config.entry_limit, Some(50));
        assert_eq!(config.uploads.unwrap().to, "https://new.example.com/uploads/");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("pro_features = true").unwrap();
        assert_eq!(config.database, Config::default().database);
        assert_eq!(config.source, None);
        assert_eq!(config.entry_limit, None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE, "/data/ff.db"),
            (ENV_PRO, "yes"),
            (ENV_ENTRY_LIMIT, "250"),
            (ENV_SOURCE, " "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database, PathBuf::from("/data/ff.db"));
        assert!(config.pro_features);
        assert_eq!(config.entry_limit, Some(250));
        assert_eq!(config.source, None);
        assert!(config.source_path().is_err());
    }

    #[test]
    fn test_invalid_limit_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_ENTRY_LIMIT).then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }
}
