//! CLI command definitions
//!
//! Defines the clap commands for the test runner.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run one or more YAML test scenarios
    Run {
        /// Paths to scenario files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of cases to run concurrently, each in its own browser
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Run with a visible browser window
        #[arg(long)]
        headed: bool,

        /// Print observed values for assertions
        #[arg(long, short)]
        verbose: bool,

        /// Path to an alternative config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse and validate scenarios without opening a browser
    Check {
        /// Paths to scenario files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}
