// stockcheck CLI - reconcile a stocktake scan against catalog exports

mod catalog;
mod exit_codes;
mod reconcile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "stockcheck")]
#[command(about = "Reconcile a stocktake scan against the product catalog")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a scan export against the catalog (exit 0 = clean, exit 1 = discrepancies)
    #[command(after_help = "\
Examples:
  stockcheck reconcile scan.csv
  stockcheck reconcile scan.csv --config shop.stockcheck.toml
  stockcheck reconcile scan.csv --catalog-dir ./exports --json
  stockcheck reconcile scan.csv --output result.json")]
    Reconcile {
        /// Stocktake export (CSV; article, size and quantity columns per [scan])
        scan: PathBuf,

        /// Catalog config (.toml); the built-in retailer config when omitted
        #[arg(long, env = "STOCKCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Directory holding the catalog exports (default: the config's directory)
        #[arg(long)]
        catalog_dir: Option<PathBuf>,

        /// Output JSON to stdout instead of the article report
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the sizes the catalog offers for one article
    #[command(after_help = "\
Examples:
  stockcheck lookup Дж-553
  stockcheck lookup 'Об 77' --catalog-dir ./exports --json")]
    Lookup {
        /// Article code as written on the tag
        article: String,

        /// Catalog config (.toml); the built-in retailer config when omitted
        #[arg(long, env = "STOCKCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Directory holding the catalog exports (default: the config's directory)
        #[arg(long)]
        catalog_dir: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a catalog config without running
    #[command(after_help = "\
Examples:
  stockcheck validate shop.stockcheck.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },

    /// List configured categories and their article prefixes
    Categories {
        /// Catalog config (.toml); the built-in retailer config when omitted
        #[arg(long, env = "STOCKCHECK_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Reconcile {
            scan,
            config,
            catalog_dir,
            json,
            output,
        } => reconcile::cmd_reconcile(scan, config, catalog_dir, json, output),
        Commands::Lookup {
            article,
            config,
            catalog_dir,
            json,
        } => reconcile::cmd_lookup(article, config, catalog_dir, json),
        Commands::Validate { config } => catalog::cmd_validate(config),
        Commands::Categories { config } => catalog::cmd_categories(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr; `log` records from the library crates arrive through
/// the subscriber's `tracing-log` bridge.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
