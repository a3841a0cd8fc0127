//! CLI definitions for DuckDuck.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// DuckDuck CLI.
#[derive(Parser)]
#[command(name = "duckduck")]
#[command(about = "Smart-lighting device agent")]
#[command(version)]
pub(crate) struct Cli {
    /// Device configuration file path
    #[arg(short, long, default_value = ".device_config", env = "DUCKDUCK_CONFIG", global = true)]
    pub config: PathBuf,

    /// Log to the console only
    #[arg(long, global = true)]
    pub no_file_log: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Connect to the broker and run the agent (default)
    Run,

    /// Load and validate the configuration, then exit
    CheckConfig,

    /// Print the jobs an alarm would schedule
    PreviewAlarm {
        /// Alarm record as JSON
        file: PathBuf,

        /// Dim lead time in minutes (defaults to the configured value)
        #[arg(long)]
        dim_minutes: Option<u32>,
    },
}
