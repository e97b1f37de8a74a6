//! `forms` command

use anyhow::Result;
use colored::*;

use crate::cli::{build_migrator, open_destination};
use crate::config::Config;

pub async fn handle_forms_command(config: &Config) -> Result<()> {
    let migrator = build_migrator(config, open_destination(config).await?)?;
    let forms = migrator.forms_formatted().await?;

    if forms.is_empty() {
        println!("{}", "No source forms found".yellow());
        return Ok(());
    }

    println!("{}", format!("{} source forms", forms.len()).bold());
    for form in forms {
        let status = match form.imported_id {
            Some(id) => format!("imported as #{}", id).green(),
            None => "not imported".dimmed(),
        };
        println!("  {:>6}  {}  ({})", form.id.cyan(), form.name, status);
    }

    Ok(())
}
