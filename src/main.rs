//! DuckDuck - smart-lighting device agent
//!
//! Main entry point for the agent and its offline subcommands.

mod agent;
mod cli;
mod commands;
mod logging;
mod publisher;
mod transport;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use duckduck_config::{ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = ConfigLoader::load(&cli.config)
                .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
            let warnings = ConfigValidator::validate(&config).into_result()?;

            let log_dir = config.log_dir();
            logging::init_tracing((!cli.no_file_log).then_some(log_dir.as_path()))?;
            for warning in warnings {
                warn!("Config {}: {}", warning.path, warning.message);
            }

            agent::run(config).await
        }
        Commands::CheckConfig => {
            logging::init_tracing(None)?;
            commands::check_config(&cli.config)
        }
        Commands::PreviewAlarm { file, dim_minutes } => {
            logging::init_tracing(None)?;
            commands::preview_alarm(&cli.config, &file, dim_minutes)
        }
    }
}
