//! Partials - HTML partial includes with session caching
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use partials::cli::{Cli, Commands};
use partials::config::ConfigManager;
use partials::error::PartialsResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PartialsResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        partials::cli::commands::completions(shell);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug; config can raise the floor to info
    let level = match cli.verbose {
        0 if !config.general.verbose => "partials=warn",
        0 | 1 => "partials=info",
        _ => "partials=debug",
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
    debug!("Loaded configuration from {}", config_manager.path().display());

    match cli.command {
        Commands::Completions { .. } => unreachable!("Completions handled above"),
        Commands::Render(args) => partials::cli::commands::render(args, &config).await,
        Commands::Cache(args) => partials::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            partials::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
