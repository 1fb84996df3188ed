//! webtest - a browser end-to-end test runner
//!
//! Runs YAML test scenarios against live pages by driving Chromium over the
//! Chrome DevTools Protocol.

use clap::Parser;
use webtest::commands::Commands;
use webtest::{cli, common};

#[derive(Parser)]
#[command(name = "webtest", about = "Browser end-to-end test runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
