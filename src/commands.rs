//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Show a test program with its features and test cases
    Show {
        /// Path to the YAML test plan
        plan: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the DUT feature list of a test plan
    Features {
        /// Path to the YAML test plan
        plan: PathBuf,

        /// Separator between entries (default from config)
        #[arg(long)]
        delimiter: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the execution queue built from the eligible test cases
    #[command(alias = "q")]
    Queue {
        /// Path to the YAML test plan
        plan: PathBuf,

        /// First queue position to show
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        /// Number of entries to show (-1 for all)
        #[arg(long, default_value = "-1", allow_negative_numbers = true)]
        length: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pass the eligible test cases through the worker pool without executing them
    Run {
        /// Path to the YAML test plan
        plan: PathBuf,

        /// Number of workers (default from config)
        #[arg(long, short = 'w')]
        workers: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known certification programs
    Programs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command asked for JSON output
    pub fn wants_json(&self) -> bool {
        match self {
            Commands::Show { json, .. }
            | Commands::Features { json, .. }
            | Commands::Queue { json, .. }
            | Commands::Run { json, .. }
            | Commands::Programs { json } => *json,
        }
    }
}
