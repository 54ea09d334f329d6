//! # irid
//!
//! Command-line interface for the Iridescia ABI tool.
//!
//! ## Usage
//!
//! ```bash
//! # Decode calldata with an ABI file or inline JSON
//! irid abi decode 0xa9059cbb... --abi token.json
//!
//! # Encode a call
//! irid abi encode "transfer(address,uint256)" 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045 1000000000000000000
//!
//! # Selector of a signature
//! irid abi selector "transfer(address,uint256)"
//!
//! # Configuration
//! irid config --show
//! irid config --set-log-level debug --set-json true
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

use config::Config;
use error::CliError;
use output::Output;

/// Iridescia ABI tool
#[derive(Parser, Debug)]
#[command(name = "irid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log filter, e.g. "debug" or "irid_abi=trace" (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode and decode ABI calldata
    #[command(subcommand)]
    Abi(commands::abi::AbiCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the default log level
        #[arg(long)]
        set_log_level: Option<String>,
        /// Set whether output defaults to JSON
        #[arg(long)]
        set_json: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = Config::load();
    let log_level = match (&cli.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.log_level.clone(),
        (None, Err(_)) => Config::default().log_level,
    };
    init_tracing(&log_level);

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring config file");
        Config::default()
    });
    let json = cli.json || config.json;

    let result = match cli.command {
        Commands::Abi(cmd) => cmd.execute(json),
        Commands::Config {
            show,
            set_log_level,
            set_json,
        } => handle_config(&mut config, show, set_log_level, set_json, json),
    };

    if let Err(e) = result {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_log_level: Option<String>,
    set_json: Option<bool>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(level) = set_log_level {
        config.set_log_level(&level)?;
        modified = true;
    }

    if let Some(value) = set_json {
        config.json = value;
        modified = true;
    }

    if modified {
        config.save()?;
        Output::new(json)
            .field("status", "saved")
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field("log_level", &config.log_level)
            .field_bool("json", config.json)
            .message(&format!(
                "Log level: {}\nJSON output: {}",
                config.log_level, config.json
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-log-level/--set-json to modify")
            .print();
    }

    Ok(())
}
