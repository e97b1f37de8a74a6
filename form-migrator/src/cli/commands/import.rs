//! `import` command

use std::sync::Arc;

use anyhow::Result;
use colored::*;

use super::ImportArgs;
use crate::cli::{build_migrator, open_destination};
use crate::config::Config;
use crate::migrator::MemoryDestination;

pub async fn handle_import_command(args: ImportArgs, config: &Config) -> Result<()> {
    let dry_run = if args.dry_run {
        println!("{}", "Dry run: nothing is written to the database".yellow());
        Some(Arc::new(MemoryDestination::new()))
    } else {
        None
    };

    let migrator = match &dry_run {
        Some(memory) => build_migrator(config, memory.clone())?,
        None => build_migrator(config, open_destination(config).await?)?,
    };

    let ids = if args.all { Vec::new() } else { args.ids };
    let report = migrator.import_all(&ids).await?;

    for outcome in &report.imported {
        let verb = if outcome.reimported { "Updated" } else { "Imported" };
        println!(
            "{} {} {} -> #{}",
            "✓".green(),
            verb,
            outcome.title.bold(),
            outcome.form_id
        );
        if !outcome.unsupported_fields.is_empty() {
            println!(
                "    {} {}",
                "unsupported fields:".yellow(),
                outcome.unsupported_fields.join(", ")
            );
        }

        if args.with_entries {
            match migrator.import_entries(&outcome.source_id).await {
                Ok(result) => println!(
                    "    {} of {} entries imported{}",
                    result.imported,
                    result.total,
                    if result.skipped > 0 {
                        format!(", {} skipped", result.skipped).yellow().to_string()
                    } else {
                        String::new()
                    }
                ),
                Err(e) => println!("    {} {:#}", "entries failed:".red(), e),
            }
        }
    }

    for failure in &report.failed {
        if failure.name.is_empty() {
            println!("{} {} {}", "✗".red(), failure.source_id.bold(), failure.error);
        } else {
            println!(
                "{} {} ({}) {}",
                "✗".red(),
                failure.name.bold(),
                failure.source_id,
                failure.error
            );
        }
    }

    if let Some(memory) = &dry_run {
        print_dry_run(memory)?;
    }

    println!(
        "\n{} imported, {} failed",
        report.imported.len().to_string().green(),
        report.failed.len().to_string().red()
    );

    if report.imported.is_empty() && !report.failed.is_empty() {
        anyhow::bail!("No forms were imported");
    }

    Ok(())
}

/// What a dry run would have written
fn print_dry_run(memory: &MemoryDestination) -> Result<()> {
    let forms = memory.forms()?;
    if forms.is_empty() {
        return Ok(());
    }

    println!("\n{}", "Would write:".yellow());
    for form in forms {
        let fields = form
            .fields
            .as_ref()
            .and_then(|document| document["fields"].as_array())
            .map_or(0, Vec::len);
        let (notifications, confirmations) = form
            .meta
            .as_ref()
            .map_or((0, 0), |meta| (meta.notifications.len(), meta.confirmations.len()));

        println!(
            "  #{} {}: {} fields, {} notifications, {} confirmations, {} entries",
            form.id,
            form.title.bold(),
            fields,
            notifications,
            confirmations,
            memory.entries(form.id)?.len()
        );
    }

    Ok(())
}
