//! `entries` command

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;

use super::EntriesArgs;
use crate::cli::build_migrator;
use crate::config::Config;
use crate::migrator::MemoryDestination;

pub async fn handle_entries_command(args: EntriesArgs, config: &Config) -> Result<()> {
    let migrator = build_migrator(config, Arc::new(MemoryDestination::new()))?;
    let batch = migrator.get_entries(&args.id).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&batch.entries).context("Failed to encode entries")?
    );

    for skipped in &batch.skipped {
        eprintln!("{} {}", "skipped:".yellow(), skipped);
    }

    Ok(())
}
