mod cli;
mod config;
mod migrator;
mod settings;

use clap::Parser;
use colored::*;

use cli::Cli;
use config::Config;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    log::debug!("Using config: {:?}", config);

    cli::run(args.command, config).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
