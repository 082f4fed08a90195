//! # Gridserve
//!
//! Serves HTML grids whose size comes from the query string:
//! `/grid?size=3` renders a 9x9 board split into 3x3 blocks and
//! `/grid?n=2&m=4` a plain 2x4 table.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;

use commands::ServeArgs;

#[derive(Parser)]
#[command(name = "gridserve")]
#[command(version)]
#[command(about = "Serve query-sized HTML grids", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the grid server (default)
    Serve(ServeArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let telemetry_config =
        gridserve_telemetry::TelemetryConfig::new("gridserve").with_log_level(&cli.log_level);

    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };

    gridserve_telemetry::init_logging(&telemetry_config);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::Config::config_path);
    let cfg = config::Config::load(&config_path);

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            commands::serve(args, cfg).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config(&cfg, &config_path);
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
            }
        },

        Commands::Version => {
            commands::version();
        }
    }

    Ok(())
}
