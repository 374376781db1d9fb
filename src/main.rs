//! Certification Harness CLI
//!
//! Loads YAML test plans, shows the resulting test program and execution
//! queue, and dry-runs the queue through the worker pool.

use std::path::PathBuf;

use clap::Parser;
use harness::cli;
use harness::commands::Commands;
use harness::common::{config::Config, error::ErrorReport, logging};

#[derive(Parser)]
#[command(name = "harness", about = "Certification test harness")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to the platform log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let log_guard = if cli.log_file {
        logging::init_with_file().map(|(guard, path)| {
            tracing::debug!(path = %path.display(), "Logging to file");
            guard
        })
    } else {
        logging::init_cli();
        None
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let json = cli.command.wants_json();
    let result = match config {
        Ok(config) => cli::dispatch(cli.command, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if json {
            let report = serde_json::json!({ "error": ErrorReport::from(&e) });
            println!("{}", report);
        } else {
            eprintln!("Error: {e}");
        }
        drop(log_guard);
        std::process::exit(1);
    }
}
