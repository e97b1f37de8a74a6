//! `module` commands

use anyhow::Result;
use colored::*;

use super::ModuleCommands;
use crate::config::Config;
use crate::config::repository;
use crate::settings::{ModuleStatusService, SqliteSettingsStore};

pub async fn handle_module_command(command: ModuleCommands, config: &Config) -> Result<()> {
    let pool = repository::connect(&config.database).await?;
    let service = ModuleStatusService::new(SqliteSettingsStore::new(pool));

    match command {
        ModuleCommands::Status { key: Some(key) } => {
            let status = if service.is_enabled(&key).await? {
                "enabled".green()
            } else {
                "disabled".dimmed()
            };
            println!("{}: {}", key.bold(), status);
        }
        ModuleCommands::Status { key: None } => {
            let statuses = service.statuses().await?;
            if statuses.is_empty() {
                println!("{}", "No module statuses set".yellow());
            }
            for (key, status) in statuses {
                println!("{}: {}", key.bold(), status);
            }
        }
        ModuleCommands::Set { key, status } => {
            service.update_module_status(&key, &status).await?;
            println!("{} {} set to {}", "✓".green(), key.bold(), status);
        }
    }

    Ok(())
}
