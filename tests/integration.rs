//! End-to-end tests for the scenario runner
//!
//! Runs the shipped scenario files against an in-memory fake of the demo
//! sites, so the full pipeline (YAML -> steps -> session calls -> results)
//! is exercised without a browser or network access.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use webtest::scenario::{run_steps, Scenario};
use webtest::session::{Locator, Role, Session, Strategy};
use webtest::{Error, Result};

const LOGIN_URL: &str = "https://the-internet.herokuapp.com/login";
const SECURE_URL: &str = "https://the-internet.herokuapp.com/secure";
const CHECKBOXES_URL: &str = "https://the-internet.herokuapp.com/checkboxes";
const HOME_URL: &str = "https://playwright.dev/";
const INTRO_URL: &str = "https://playwright.dev/docs/intro";

/// What clicking an element does to the fake site
#[derive(Debug, Clone)]
enum ClickEffect {
    Goto(&'static str),
    SubmitLogin,
}

/// One element of a fake page
#[derive(Debug, Clone, Default)]
struct El {
    role: Option<Role>,
    selectors: Vec<&'static str>,
    /// Visible text, or current value for form fields
    text: String,
    label: String,
    visible: bool,
    checked: bool,
    on_click: Option<ClickEffect>,
}

impl El {
    fn textbox(label: &str) -> Self {
        Self {
            role: Some(Role::Textbox),
            label: label.to_string(),
            visible: true,
            ..Default::default()
        }
    }

    fn heading(text: &str) -> Self {
        Self {
            role: Some(Role::Heading),
            selectors: vec!["h2"],
            text: text.to_string(),
            visible: true,
            ..Default::default()
        }
    }

    fn checkbox(checked: bool) -> Self {
        Self {
            role: Some(Role::Checkbox),
            visible: true,
            checked,
            ..Default::default()
        }
    }
}

/// In-memory model of the two demo sites
#[derive(Debug, Default)]
struct FakeSite {
    url: String,
    title: String,
    elements: Vec<El>,
}

impl FakeSite {
    fn new() -> Self {
        Self::default()
    }

    fn load(&mut self, url: &str) -> Result<()> {
        let (title, elements) = match url {
            HOME_URL => (
                "Fast and reliable end-to-end testing for modern web apps | Playwright",
                vec![
                    El {
                        role: Some(Role::Link),
                        text: "Docs".to_string(),
                        visible: true,
                        ..Default::default()
                    },
                    El {
                        role: Some(Role::Link),
                        text: "Get started".to_string(),
                        visible: true,
                        on_click: Some(ClickEffect::Goto(INTRO_URL)),
                        ..Default::default()
                    },
                ],
            ),
            INTRO_URL => ("Installation | Playwright", vec![]),
            LOGIN_URL => (
                "The Internet",
                vec![
                    El::heading("Login Page"),
                    El::textbox("Username"),
                    El::textbox("Password"),
                    El {
                        role: Some(Role::Button),
                        // The live site renders the label with a leading
                        // non-breaking space
                        text: "\u{a0}Login".to_string(),
                        visible: true,
                        on_click: Some(ClickEffect::SubmitLogin),
                        ..Default::default()
                    },
                ],
            ),
            SECURE_URL => (
                "The Internet",
                vec![
                    El {
                        selectors: vec!["#flash", ".flash.success"],
                        text: "\u{d7}\nYou logged into a secure area!".to_string(),
                        visible: true,
                        ..Default::default()
                    },
                    El::heading("Secure Area"),
                    El {
                        role: Some(Role::Link),
                        text: "Logout".to_string(),
                        visible: true,
                        on_click: Some(ClickEffect::Goto(LOGIN_URL)),
                        ..Default::default()
                    },
                ],
            ),
            CHECKBOXES_URL => (
                "The Internet",
                vec![
                    El::heading("Checkboxes"),
                    El::checkbox(false),
                    El::checkbox(true),
                ],
            ),
            other => {
                return Err(Error::Navigation {
                    url: other.to_string(),
                    reason: "unknown page in fake site".to_string(),
                })
            }
        };

        self.url = url.to_string();
        self.title = title.to_string();
        self.elements = elements;
        Ok(())
    }

    /// Rejected login: back on the login page with an error flash
    fn load_login_error(&mut self) {
        self.load(LOGIN_URL).unwrap();
        self.elements.insert(
            0,
            El {
                selectors: vec!["#flash", ".flash.error"],
                text: "\u{d7}\nYour password is invalid!".to_string(),
                visible: true,
                ..Default::default()
            },
        );
    }

    /// Indices of elements matching the locator's strategy, in page order
    fn matching(&self, locator: &Locator) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| match &locator.strategy {
                Strategy::Role { role, .. } => e.role == Some(*role),
                Strategy::Css(sel) => e.selectors.contains(&sel.as_str()),
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn resolve(&self, locator: &Locator) -> Result<usize> {
        let matching = self.matching(locator);
        let candidates: Vec<webtest::session::Candidate> = matching
            .iter()
            .map(|&i| {
                let e = &self.elements[i];
                webtest::session::Candidate {
                    text: e.text.clone(),
                    label: e.label.clone(),
                    visible: e.visible,
                    checked: e.checked,
                }
            })
            .collect();
        locator.resolve(&candidates).map(|i| matching[i])
    }

    fn field_value(&self, label: &str) -> String {
        self.elements
            .iter()
            .find(|e| e.role == Some(Role::Textbox) && e.label == label)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Session for FakeSite {
    async fn navigate(&mut self, url: &str, _timeout: Option<Duration>) -> Result<()> {
        self.load(url)
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let i = self.resolve(locator)?;
        match self.elements[i].on_click.clone() {
            Some(ClickEffect::Goto(url)) => self.load(url),
            Some(ClickEffect::SubmitLogin) => {
                let username = self.field_value("Username");
                let password = self.field_value("Password");
                if username == "tomsmith" && password == "SuperSecretPassword!" {
                    self.load(SECURE_URL)
                } else {
                    self.load_login_error();
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> Result<()> {
        let i = self.resolve(locator)?;
        self.elements[i].text = value.to_string();
        Ok(())
    }

    async fn check(&mut self, locator: &Locator) -> Result<()> {
        let i = self.resolve(locator)?;
        self.elements[i].checked = true;
        Ok(())
    }

    async fn is_checked(&mut self, locator: &Locator) -> Result<bool> {
        let i = self.resolve(locator)?;
        Ok(self.elements[i].checked)
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        match self.resolve(locator) {
            Ok(i) => Ok(self.elements[i].visible),
            Err(Error::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        let i = self.resolve(locator)?;
        Ok(self.elements[i].text.clone())
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn url(&mut self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

fn scenario_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file)
}

async fn run_shipped(file: &str) -> webtest::scenario::CaseResult {
    let scenario = Scenario::from_path(&scenario_path(file)).expect("scenario should parse");
    let mut session = FakeSite::new();
    run_steps(&mut session, &scenario, false).await
}

#[tokio::test]
async fn test_homepage_scenario_passes() {
    let result = run_shipped("homepage.yaml").await;
    assert!(result.passed, "failure: {:?}", result.error);
}

#[tokio::test]
async fn test_get_started_scenario_passes() {
    let result = run_shipped("get-started.yaml").await;
    assert!(result.passed, "failure: {:?}", result.error);
}

#[tokio::test]
async fn test_login_scenario_passes() {
    let result = run_shipped("login.yaml").await;
    assert!(result.passed, "failure: {:?}", result.error);
    assert_eq!(result.steps_run, result.steps_total);
}

#[tokio::test]
async fn test_login_invalid_scenario_passes() {
    let result = run_shipped("login-invalid.yaml").await;
    assert!(result.passed, "failure: {:?}", result.error);
}

#[tokio::test]
async fn test_checkboxes_scenario_passes() {
    let result = run_shipped("checkboxes.yaml").await;
    assert!(result.passed, "failure: {:?}", result.error);
}

#[tokio::test]
async fn test_wrong_password_does_not_reach_secure_area() {
    let scenario = Scenario::parse(
        r##"
        name: wrong password must not log in
        steps:
          - action: navigate
            url: https://the-internet.herokuapp.com/login
          - action: fill
            role: textbox
            name: Username
            value: tomsmith
          - action: fill
            role: textbox
            name: Password
            value: wrong
          - action: click
            role: button
            name: Login
          - action: assert_text
            selector: "#flash"
            contains: You logged into a secure area
        "##,
    )
    .unwrap();

    let mut session = FakeSite::new();
    let result = run_steps(&mut session, &scenario, false).await;

    assert!(!result.passed);
    assert_eq!(result.steps_run, 5);
    let error = result.error.unwrap();
    assert!(
        error.contains("does not contain 'You logged into a secure area'"),
        "got: {error}"
    );
    assert_eq!(session.url, LOGIN_URL);
}

#[tokio::test]
async fn test_button_name_matches_despite_odd_whitespace() {
    // The live login button renders "\u{a0}Login"; plain "Login" must
    // still address it.
    let scenario = Scenario::parse(
        r#"
        name: click login by plain name
        steps:
          - action: navigate
            url: https://the-internet.herokuapp.com/login
          - action: click
            role: button
            name: Login
            exact: true
        "#,
    )
    .unwrap();

    let mut session = FakeSite::new();
    let result = run_steps(&mut session, &scenario, false).await;
    assert!(result.passed, "failure: {:?}", result.error);
}

#[test]
fn test_all_shipped_scenarios_validate() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    let mut found = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            Scenario::from_path(&path)
                .unwrap_or_else(|e| panic!("{} failed to validate: {e}", path.display()));
            found += 1;
        }
    }
    assert_eq!(found, 5);
}
