//! `translate` command

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use serde_json::json;

use super::TranslateArgs;
use crate::cli::build_migrator;
use crate::config::Config;
use crate::migrator::MemoryDestination;

pub async fn handle_translate_command(args: TranslateArgs, config: &Config) -> Result<()> {
    let migrator = build_migrator(config, Arc::new(MemoryDestination::new()))?;
    let translation = migrator.translate_form(&args.id).await?;

    if args.summary {
        let form = translation.form();
        println!("{} {}", "Form:".bold(), form.title);
        for field in form.fields.values() {
            println!(
                "  {:<20} {:<18} {}",
                field.name.cyan(),
                field.element().as_str(),
                field.label
            );
        }
        if translation.fields.has_steps {
            let wrapper = if form.step_wrapper.is_some() { "with" } else { "without" };
            println!("  {} ({} step wrapper)", "multi-step".yellow(), wrapper);
        }
        for label in translation.unsupported_fields() {
            println!("  {} {}", "unsupported:".red(), label);
        }
        println!(
            "  {} notifications, {} confirmations",
            translation.meta.notifications.len(),
            translation.meta.confirmations.len() + 1
        );
        return Ok(());
    }

    let document = json!({
        "title": translation.form().title,
        "form_fields": translation.form().to_json(),
        "metas": translation.meta,
        "unsupported_fields": translation.unsupported_fields(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&document).context("Failed to encode translation")?
    );

    Ok(())
}
