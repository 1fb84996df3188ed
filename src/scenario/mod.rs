//! Scenario loading and execution
//!
//! A scenario is one independent test case: an ordered sequence of
//! navigate/act/assert steps read from a YAML file and executed against an
//! isolated browsing session.

mod config;
mod runner;

pub use config::{Scenario, Step, Target};
pub use runner::{run_all, run_scenario, run_steps, CaseResult, RunOptions};
