//! Browsing sessions
//!
//! A session is an isolated browsing context executing exactly one test
//! case. The `Session` trait is the collaborator contract the runner is
//! written against; `BrowserSession` implements it over the Chrome DevTools
//! Protocol, and tests substitute in-memory fakes.

mod browser;
mod locator;

pub use browser::BrowserSession;
pub use locator::{Candidate, Locator, Role, Selection, Strategy};

use std::time::Duration;

use async_trait::async_trait;

use crate::common::Result;

/// Contract between the step executor and a browsing session.
///
/// Element-addressed operations take a [`Locator`] and perform the session's
/// implicit bounded waiting for the element to appear; the runner adds no
/// retry logic of its own. Visibility checks report `false` for an absent
/// element instead of failing, so negative assertions can use them.
#[async_trait]
pub trait Session: Send {
    /// Load a URL, waiting for the page to settle within the session's
    /// navigation timeout (or a per-step override).
    async fn navigate(&mut self, url: &str, timeout: Option<Duration>) -> Result<()>;

    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Replace the element's value with `value`, firing input events.
    async fn fill(&mut self, locator: &Locator, value: &str) -> Result<()>;

    /// Ensure a checkbox is checked (no-op when it already is).
    async fn check(&mut self, locator: &Locator) -> Result<()>;

    async fn is_checked(&mut self, locator: &Locator) -> Result<bool>;

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool>;

    /// Visible text content of the element.
    async fn text(&mut self, locator: &Locator) -> Result<String>;

    async fn title(&mut self) -> Result<String>;

    async fn url(&mut self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}
