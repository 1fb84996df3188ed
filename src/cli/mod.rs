//! CLI command handling
//!
//! Dispatches CLI commands and formats the suite summary.

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::scenario::{self, CaseResult, RunOptions, Scenario};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            paths,
            jobs,
            headed,
            verbose,
            config,
        } => {
            let config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };

            let mut opts = RunOptions::from_config(&config);
            opts.verbose = verbose;
            if headed {
                opts.browser.headless = false;
            }

            let jobs = jobs.unwrap_or(config.runner.jobs);
            let results = scenario::run_all(&paths, &opts, jobs).await;

            print_summary(&results);

            let failed = results.iter().filter(|r| !r.passed).count();
            if failed > 0 {
                Err(Error::CasesFailed {
                    failed,
                    total: results.len(),
                })
            } else {
                Ok(())
            }
        }

        Commands::Check { paths } => {
            let mut invalid = 0;
            for path in &paths {
                match Scenario::from_path(path) {
                    Ok(scenario) => {
                        println!(
                            "{} {} ({} steps)",
                            "✓".green(),
                            scenario.name,
                            scenario.steps.len()
                        );
                    }
                    Err(e) => {
                        invalid += 1;
                        println!("{} {}: {}", "✗".red(), path.display(), e);
                    }
                }
            }

            if invalid > 0 {
                Err(Error::CasesFailed {
                    failed: invalid,
                    total: paths.len(),
                })
            } else {
                Ok(())
            }
        }
    }
}

fn print_summary(results: &[CaseResult]) {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    println!("{}", "Summary:".cyan().bold());
    for result in results {
        if result.passed {
            println!(
                "  {} {} ({}/{} steps)",
                "✓".green(),
                result.name,
                result.steps_run,
                result.steps_total
            );
        } else {
            println!(
                "  {} {} ({}/{} steps): {}",
                "✗".red(),
                result.name,
                result.steps_run,
                result.steps_total,
                result.error.as_deref().unwrap_or("unknown failure")
            );
        }
    }

    if failed == 0 {
        println!(
            "\n{}",
            format!("{} passed", passed).green().bold()
        );
    } else {
        println!(
            "\n{}, {}",
            format!("{} passed", passed).green(),
            format!("{} failed", failed).red().bold()
        );
    }
}
