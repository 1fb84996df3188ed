//! Error types for the test runner
//!
//! Every failure surfaces as a failed test case with a diagnostic naming
//! the step and the expected vs. actual value; nothing is recovered locally.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    #[error("Chrome/Chromium not found. Install it or set browser.chrome_path in config.toml")]
    ChromeNotFound,

    #[error("Failed to start browser session: {0}")]
    SessionStart(String),

    #[error("Browser disconnected: {0}")]
    SessionLost(String),

    // === Navigation Errors ===
    #[error("Navigation to '{url}' timed out after {secs} seconds")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("Navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    // === Locator Errors ===
    #[error("No element matched {locator}")]
    ElementNotFound { locator: String },

    #[error("{locator} matched {count} elements; add 'index' or 'first: true' to disambiguate")]
    AmbiguousLocator { locator: String, count: usize },

    // === Assertion Errors ===
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // === Step Errors ===
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    // === Browser/CDP Errors ===
    #[error("Browser error: {0}")]
    Browser(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Suite Errors ===
    #[error("{failed} of {total} test cases failed")]
    CasesFailed { failed: usize, total: usize },
}

impl Error {
    /// Create an assertion error from a step label and expected/actual pair
    pub fn assertion(
        step: &str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::Assertion(format!("{step}: expected {expected}, got {actual}"))
    }
}
