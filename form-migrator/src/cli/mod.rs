//! Command line interface

pub mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::config::repository::{self, SqliteDestinationStore};
use crate::migrator::{DestinationStore, ExportSourceStore, FixedLimit, Migrator, UrlRewriteMigrator};

use commands::{EntriesArgs, ImportArgs, ModuleCommands, TranslateArgs};

#[derive(Parser, Debug)]
#[command(name = "form-migrator")]
#[command(version, about = "Migrate WPForms forms and entries into Fluent Forms")]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// WPForms export file (overrides config)
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,

    /// Destination database (overrides config)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable destination pro features
    #[arg(long, global = true)]
    pub pro: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List source forms and whether they were imported
    Forms,
    /// Print the translated destination form
    Translate(TranslateArgs),
    /// Import forms (and optionally their entries)
    Import(ImportArgs),
    /// Print a form's translated entries
    Entries(EntriesArgs),
    /// Global module status
    #[command(subcommand)]
    Module(ModuleCommands),
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if self.pro {
            config.pro_features = true;
        }
    }
}

pub async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Forms => commands::forms::handle_forms_command(&config).await,
        Commands::Translate(args) => commands::translate::handle_translate_command(args, &config).await,
        Commands::Import(args) => commands::import::handle_import_command(args, &config).await,
        Commands::Entries(args) => commands::entries::handle_entries_command(args, &config).await,
        Commands::Module(command) => commands::module::handle_module_command(command, &config).await,
    }
}

/// Open the configured destination database
pub async fn open_destination(config: &Config) -> Result<Arc<dyn DestinationStore>> {
    let pool = repository::connect(&config.database).await?;
    Ok(Arc::new(SqliteDestinationStore::new(pool)))
}

/// Build a migrator from the configured source export into `destination`
pub fn build_migrator(config: &Config, destination: Arc<dyn DestinationStore>) -> Result<Migrator> {
    let source = Arc::new(ExportSourceStore::load(config.source_path()?)?);

    let mut migrator = Migrator::new(source, destination, config.pro_features);

    if let Some(limit) = config.entry_limit {
        migrator = migrator.with_limit(Arc::new(FixedLimit(limit)));
    }
    if let Some(uploads) = &config.uploads {
        migrator = migrator.with_files(Arc::new(UrlRewriteMigrator::new(
            uploads.from.clone(),
            uploads.to.clone(),
        )));
    }

    Ok(migrator)
}
