//! Test case execution
//!
//! Executes scenario steps against a browsing session and reports per-step
//! success/failure. A case halts at its first failing step; independent
//! cases may run concurrently across isolated sessions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use futures_util::stream::{self, StreamExt};

use crate::common::config::{BrowserConfig, Config, Timeouts};
use crate::common::{Error, Result};
use crate::session::{BrowserSession, Session};

use super::config::{Scenario, Step};

/// Result of running one test case
#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Settings shared by every case in a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub timeouts: Timeouts,
    pub browser: BrowserConfig,
    pub verbose: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeouts: config.timeouts.clone(),
            browser: config.browser.clone(),
            verbose: false,
        }
    }
}

/// Run a single test case from a YAML scenario file in its own session
pub async fn run_scenario(path: &Path, opts: &RunOptions) -> Result<CaseResult> {
    let scenario = Scenario::from_path(path)?;

    println!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let mut session = BrowserSession::launch(&opts.browser, &opts.timeouts).await?;

    println!("\n{}", "Steps:".cyan());
    let result = run_steps(&mut session, &scenario, opts.verbose).await;

    let _ = session.close().await;

    if result.passed {
        println!("\n{} {}\n", "✓".green().bold(), "Test Passed".green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), "Test Failed".red().bold());
    }

    Ok(result)
}

/// Run every scenario, at most `jobs` concurrently, each in an isolated
/// session. Order of completion is not significant; cases share no state.
pub async fn run_all(paths: &[PathBuf], opts: &RunOptions, jobs: usize) -> Vec<CaseResult> {
    stream::iter(paths.to_vec())
        .map(|path| {
            let opts = opts.clone();
            async move {
                match run_scenario(&path, &opts).await {
                    Ok(result) => result,
                    // Scenario could not even start (unreadable file, no
                    // browser): report it as a failed case.
                    Err(e) => CaseResult {
                        name: path.display().to_string(),
                        passed: false,
                        steps_run: 0,
                        steps_total: 0,
                        error: Some(e.to_string()),
                    },
                }
            }
        })
        .buffer_unordered(jobs.max(1))
        .collect()
        .await
}

/// Execute the steps of a scenario against an already-open session.
///
/// Halts at the first failing step and reports that failure; remaining
/// steps are not executed.
pub async fn run_steps<S: Session>(
    session: &mut S,
    scenario: &Scenario,
    verbose: bool,
) -> CaseResult {
    let steps_total = scenario.steps.len();

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;
        match execute_step(session, step, verbose).await {
            Ok(()) => {
                println!(
                    "  {} Step {}: {}",
                    "✓".green(),
                    step_num,
                    step.describe().dimmed()
                );
            }
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, e);
                return CaseResult {
                    name: scenario.name.clone(),
                    passed: false,
                    steps_run: step_num,
                    steps_total,
                    error: Some(format!("step {} ({}): {}", step_num, step.describe(), e)),
                };
            }
        }
    }

    CaseResult {
        name: scenario.name.clone(),
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    }
}

/// Execute a single step
async fn execute_step<S: Session>(session: &mut S, step: &Step, verbose: bool) -> Result<()> {
    match step {
        Step::Navigate { url, timeout } => {
            let timeout = timeout.map(Duration::from_secs);
            session.navigate(url, timeout).await
        }

        Step::Click { target } => session.click(&target.locator()?).await,

        Step::Fill { target, value } => session.fill(&target.locator()?, value).await,

        Step::Check { target } => session.check(&target.locator()?).await,

        Step::AssertVisible { target, visible } => {
            let locator = target.locator()?;
            let actual = session.is_visible(&locator).await?;
            if actual == *visible {
                Ok(())
            } else {
                Err(Error::assertion(
                    &step.describe(),
                    visibility(*visible),
                    visibility(actual),
                ))
            }
        }

        Step::AssertChecked { target, checked } => {
            let locator = target.locator()?;
            let actual = session.is_checked(&locator).await?;
            if actual == *checked {
                Ok(())
            } else {
                Err(Error::assertion(
                    &step.describe(),
                    checked_state(*checked),
                    checked_state(actual),
                ))
            }
        }

        Step::AssertText {
            target,
            contains,
            equals,
        } => {
            let locator = target.locator()?;
            let actual = session.text(&locator).await?;
            if verbose {
                println!("      text of {} = '{}'", locator, truncate(&actual).dimmed());
            }
            check_value(&format!("text of {locator}"), &actual, contains, equals)
        }

        Step::AssertTitle { contains, equals } => {
            let actual = session.title().await?;
            if verbose {
                println!("      title = '{}'", actual.dimmed());
            }
            check_value("title", &actual, contains, equals)
        }

        Step::AssertUrl { contains, equals } => {
            let actual = session.url().await?;
            if verbose {
                println!("      url = '{}'", actual.dimmed());
            }
            check_value("url", &actual, contains, equals)
        }
    }
}

/// Compare an observed string against the step's `contains`/`equals` matcher
fn check_value(
    what: &str,
    actual: &str,
    contains: &Option<String>,
    equals: &Option<String>,
) -> Result<()> {
    if let Some(expected) = contains {
        if !actual.contains(expected.as_str()) {
            return Err(Error::Assertion(format!(
                "{} does not contain '{}'. Got: '{}'",
                what,
                expected,
                truncate(actual)
            )));
        }
    }

    if let Some(expected) = equals {
        if actual.trim() != expected.trim() {
            return Err(Error::Assertion(format!(
                "{} mismatch. Expected: '{}', got: '{}'",
                what,
                expected,
                truncate(actual)
            )));
        }
    }

    Ok(())
}

fn truncate(s: &str) -> String {
    const MAX: usize = 200;
    if s.chars().count() > MAX {
        format!("{}...", s.chars().take(MAX).collect::<String>())
    } else {
        s.to_string()
    }
}

fn visibility(visible: bool) -> &'static str {
    if visible {
        "visible"
    } else {
        "not visible"
    }
}

fn checked_state(checked: bool) -> &'static str {
    if checked {
        "checked"
    } else {
        "unchecked"
    }
}
