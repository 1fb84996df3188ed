//! Chromium-backed session
//!
//! Launches and drives one Chrome/Chromium instance over the DevTools
//! Protocol. Each session gets its own temporary user data directory, so
//! test cases never share cookies or storage.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig, HeadlessMode};
use chromiumoxide::Page;
use futures_util::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Candidate, Locator, Session};
use crate::common::config::{BrowserConfig, Timeouts};
use crate::common::{Error, Result};

/// How often element probes are retried while auto-waiting
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Collects text/label/visibility/checked state for every element matching
/// a CSS selector. Runs in the page; the result deserializes into
/// `Vec<Candidate>`.
const PROBE_JS: &str = r#"(function(css) {
    function accessibleLabel(el) {
        var aria = el.getAttribute('aria-label');
        if (aria) return aria;
        if (el.labels && el.labels.length > 0) return el.labels[0].innerText || '';
        if (el.id) {
            var label = document.querySelector('label[for="' + CSS.escape(el.id) + '"]');
            if (label) return label.innerText || '';
        }
        return el.getAttribute('placeholder') || '';
    }
    return Array.prototype.map.call(document.querySelectorAll(css), function(el) {
        return {
            text: String(el.innerText || el.value || ''),
            label: String(accessibleLabel(el)),
            visible: !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length),
            checked: !!el.checked
        };
    });
})"#;

/// Sets an input's value the way a user-visible edit would, firing the
/// events frameworks listen for.
const FILL_JS: &str = r#"(function(css, index, value) {
    var el = document.querySelectorAll(css)[index];
    if (!el) return false;
    el.focus();
    el.value = value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
})"#;

/// An isolated Chromium browsing context executing one test case
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    alive: Arc<AtomicBool>,
    navigation_timeout: Duration,
    action_timeout: Duration,
    // Removed together with the profile data when the session is dropped
    _user_data: TempDir,
}

impl BrowserSession {
    /// Launch a fresh browser with its own profile directory
    pub async fn launch(config: &BrowserConfig, timeouts: &Timeouts) -> Result<Self> {
        let chrome_path = match &config.chrome_path {
            Some(path) => path.clone(),
            None => find_chrome().ok_or(Error::ChromeNotFound)?,
        };

        let user_data = tempfile::Builder::new()
            .prefix("webtest-")
            .tempdir()
            .map_err(|e| Error::SessionStart(format!("temp profile dir: {e}")))?;

        info!(
            "Launching browser session (headless: {}, chrome: {})",
            config.headless,
            chrome_path.display()
        );

        let mut builder = CdpBrowserConfig::builder()
            .chrome_executable(&chrome_path)
            .user_data_dir(user_data.path())
            .window_size(config.window_width, config.window_height)
            .request_timeout(Duration::from_secs(timeouts.navigation_secs));

        if config.headless {
            builder = builder.headless_mode(HeadlessMode::New);
        } else {
            builder = builder.with_head();
        }

        if config.no_sandbox {
            builder = builder.no_sandbox();
        }

        let cdp_config = builder.build().map_err(Error::SessionStart)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| Error::SessionStart(e.to_string()))?;

        // When the handler stream ends, Chrome has disconnected
        let alive = Arc::new(AtomicBool::new(true));
        let alive_for_handler = alive.clone();
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {e}");
                }
            }
            warn!("Browser disconnected (event handler ended)");
            alive_for_handler.store(false, Ordering::Relaxed);
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::SessionStart(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler_task,
            alive,
            navigation_timeout: Duration::from_secs(timeouts.navigation_secs),
            action_timeout: Duration::from_secs(timeouts.action_secs),
            _user_data: user_data,
        })
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.alive.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(Error::SessionLost("browser process ended".into()))
        }
    }

    /// Query the page for elements matching the locator's CSS selector
    async fn probe(&self, locator: &Locator) -> Result<Vec<Candidate>> {
        let css = serde_json::to_string(locator.query())?;
        let expr = format!("{}({})", PROBE_JS, css);

        self.page
            .evaluate(expr)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?
            .into_value()
            .map_err(|e| Error::Browser(format!("element probe returned invalid data: {e}")))
    }

    /// Probe and resolve, retrying while the element has not appeared yet.
    ///
    /// Ambiguity is a strict failure and is not retried. Gives up with the
    /// last resolution error once the action timeout elapses.
    async fn wait_for_element(&self, locator: &Locator) -> Result<(Vec<Candidate>, usize)> {
        self.ensure_alive()?;
        let deadline = Instant::now() + self.action_timeout;

        loop {
            let candidates = self.probe(locator).await?;
            match locator.resolve(&candidates) {
                Ok(index) => return Ok((candidates, index)),
                Err(e @ Error::ElementNotFound { .. }) => {
                    if Instant::now() >= deadline {
                        return Err(e);
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Click the resolved element through a CDP element handle (scrolls into
    /// view and dispatches real mouse events).
    async fn click_nth(&self, locator: &Locator, index: usize) -> Result<()> {
        let elements = self
            .page
            .find_elements(locator.query())
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;

        let element = elements.into_iter().nth(index).ok_or_else(|| {
            // The DOM changed between probe and action
            Error::ElementNotFound {
                locator: locator.to_string(),
            }
        })?;

        element
            .click()
            .await
            .map_err(|e| Error::Browser(format!("click on {locator} failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl Session for BrowserSession {
    async fn navigate(&mut self, url: &str, timeout: Option<Duration>) -> Result<()> {
        self.ensure_alive()?;
        debug!("Navigating to {url}");
        let timeout = timeout.unwrap_or(self.navigation_timeout);

        let load = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        tokio::time::timeout(timeout, load)
            .await
            .map_err(|_| Error::NavigationTimeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            })?
            .map_err(|e| Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let (_, index) = self.wait_for_element(locator).await?;
        self.click_nth(locator, index).await
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> Result<()> {
        let (_, index) = self.wait_for_element(locator).await?;

        let css = serde_json::to_string(locator.query())?;
        let value = serde_json::to_string(value)?;
        let expr = format!("{}({}, {}, {})", FILL_JS, css, index, value);

        let filled: bool = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?
            .into_value()
            .map_err(|e| Error::Browser(format!("fill returned invalid data: {e}")))?;

        if filled {
            Ok(())
        } else {
            Err(Error::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }

    async fn check(&mut self, locator: &Locator) -> Result<()> {
        let (candidates, index) = self.wait_for_element(locator).await?;
        if candidates[index].checked {
            return Ok(());
        }
        self.click_nth(locator, index).await
    }

    async fn is_checked(&mut self, locator: &Locator) -> Result<bool> {
        let (candidates, index) = self.wait_for_element(locator).await?;
        Ok(candidates[index].checked)
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        match self.wait_for_element(locator).await {
            Ok((candidates, index)) => Ok(candidates[index].visible),
            // Absence is a valid observation for visibility predicates
            Err(Error::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        let (candidates, index) = self.wait_for_element(locator).await?;
        Ok(candidates[index].text.clone())
    }

    async fn title(&mut self) -> Result<String> {
        self.ensure_alive()?;
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        Ok(title.unwrap_or_default())
    }

    async fn url(&mut self) -> Result<String> {
        self.ensure_alive()?;
        let url = self
            .page
            .url()
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn close(&mut self) -> Result<()> {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

/// Find a Chrome/Chromium executable on the system
fn find_chrome() -> Option<PathBuf> {
    const NAMES: &[&str] = &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ];

    for name in NAMES {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // Locations that are typically not on PATH
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ]
    };

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}
