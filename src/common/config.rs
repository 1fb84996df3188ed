//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Step timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Timeout for a navigate step (page load)
    #[serde(default = "default_navigation")]
    pub navigation_secs: u64,

    /// Timeout for element lookup, actions and assertions
    #[serde(default = "default_action")]
    pub action_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_secs: default_navigation(),
            action_secs: default_action(),
        }
    }
}

fn default_navigation() -> u64 {
    30
}
fn default_action() -> u64 {
    10
}

/// Browser launch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit path to the Chrome/Chromium executable.
    /// Auto-discovered from PATH and well-known locations when unset.
    pub chrome_path: Option<PathBuf>,

    /// Window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Pass --no-sandbox to Chrome (required when running as root)
    #[serde(default)]
    pub no_sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
            no_sandbox: false,
        }
    }
}

fn default_headless() -> bool {
    true
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}

/// Runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Number of test cases to run concurrently (each in its own session)
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    1
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
