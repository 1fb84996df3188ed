//! webtest - a browser end-to-end test runner
//!
//! Executes YAML test scenarios (navigate, click, fill, check, assert)
//! against live pages by driving Chromium over the Chrome DevTools Protocol.

pub mod cli;
pub mod commands;
pub mod common;
pub mod scenario;
pub mod session;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use scenario::{Scenario, Step};
pub use session::{Locator, Role, Selection, Session};
