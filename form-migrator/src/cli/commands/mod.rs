//! Subcommand arguments and handlers

pub mod entries;
pub mod forms;
pub mod import;
pub mod module;
pub mod translate;

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Source form ID
    pub id: String,

    /// Print field and metadata summaries instead of the JSON document
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Source form IDs to import
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub ids: Vec<String>,

    /// Import every source form
    #[arg(long)]
    pub all: bool,

    /// Also import each form's entries
    #[arg(long)]
    pub with_entries: bool,

    /// Translate and report without writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// Source form ID
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    /// Show whether a module is enabled (all modules when no key is given)
    Status { key: Option<String> },
    /// Set a module's status
    Set {
        key: String,
        /// `yes` or `no`
        status: String,
    },
}
