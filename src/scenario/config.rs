//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::common::{Error, Result};
use crate::session::{Locator, Role, Selection, Strategy};

/// A complete test case loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the test case
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// The ordered sequence of steps to execute
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load and validate a scenario from a YAML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a scenario from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_yaml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::InvalidStep(format!(
                "scenario '{}' has no steps",
                self.name
            )));
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| Error::InvalidStep(format!("step {} ({}): {}", i + 1, step.describe(), e)))?;
        }
        Ok(())
    }
}

/// A single step in a test case
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Load a URL
    Navigate {
        url: String,
        /// Override of the configured navigation timeout, in seconds
        timeout: Option<u64>,
    },
    /// Click an element
    Click {
        #[serde(flatten)]
        target: Target,
    },
    /// Replace an input's value
    Fill {
        #[serde(flatten)]
        target: Target,
        value: String,
    },
    /// Ensure a checkbox is checked
    Check {
        #[serde(flatten)]
        target: Target,
    },
    /// Assert that an element is (or is not) visible
    AssertVisible {
        #[serde(flatten)]
        target: Target,
        #[serde(default = "default_true")]
        visible: bool,
    },
    /// Assert on an element's text content
    AssertText {
        #[serde(flatten)]
        target: Target,
        contains: Option<String>,
        equals: Option<String>,
    },
    /// Assert a checkbox's checked state
    AssertChecked {
        #[serde(flatten)]
        target: Target,
        #[serde(default = "default_true")]
        checked: bool,
    },
    /// Assert on the page title
    AssertTitle {
        contains: Option<String>,
        equals: Option<String>,
    },
    /// Assert on the current URL
    AssertUrl {
        contains: Option<String>,
        equals: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl Step {
    /// Short human-readable label used in runner output and diagnostics
    pub fn describe(&self) -> String {
        match self {
            Step::Navigate { url, .. } => format!("navigate {url}"),
            Step::Click { target } => format!("click {target}"),
            Step::Fill { target, .. } => format!("fill {target}"),
            Step::Check { target } => format!("check {target}"),
            Step::AssertVisible { target, visible } => {
                if *visible {
                    format!("assert {target} is visible")
                } else {
                    format!("assert {target} is not visible")
                }
            }
            Step::AssertText { target, .. } => format!("assert text of {target}"),
            Step::AssertChecked { target, checked } => {
                if *checked {
                    format!("assert {target} is checked")
                } else {
                    format!("assert {target} is unchecked")
                }
            }
            Step::AssertTitle { .. } => "assert title".to_string(),
            Step::AssertUrl { .. } => "assert url".to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Step::Navigate { .. } => Ok(()),
            Step::Click { target }
            | Step::Check { target }
            | Step::Fill { target, .. }
            | Step::AssertVisible { target, .. }
            | Step::AssertChecked { target, .. } => target.locator().map(|_| ()),
            Step::AssertText {
                target,
                contains,
                equals,
            } => {
                target.locator()?;
                exactly_one(contains, equals)
            }
            Step::AssertTitle { contains, equals } | Step::AssertUrl { contains, equals } => {
                exactly_one(contains, equals)
            }
        }
    }
}

fn exactly_one(contains: &Option<String>, equals: &Option<String>) -> Result<()> {
    match (contains, equals) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(Error::InvalidStep(
            "needs exactly one of 'contains' or 'equals'".into(),
        )),
    }
}

/// Element reference within a step: a role-based or CSS-based strategy plus
/// optional ordinal selection
#[derive(Deserialize, Debug, Default)]
pub struct Target {
    /// Accessibility role (button, link, textbox, checkbox, heading)
    pub role: Option<Role>,
    /// Accessible name filter for role-based lookup
    pub name: Option<String>,
    /// Match the accessible name exactly instead of by substring
    #[serde(default)]
    pub exact: bool,
    /// Raw CSS selector (alternative to `role`)
    pub selector: Option<String>,
    /// Pick the nth match (0-based)
    pub index: Option<usize>,
    /// Pick the first match
    #[serde(default)]
    pub first: bool,
}

impl Target {
    /// Convert to a [`Locator`], rejecting contradictory combinations
    pub fn locator(&self) -> Result<Locator> {
        let strategy = match (&self.role, &self.selector) {
            (Some(role), None) => Strategy::Role {
                role: *role,
                name: self.name.clone(),
                exact: self.exact,
            },
            (None, Some(selector)) => Strategy::Css(selector.clone()),
            (Some(_), Some(_)) => {
                return Err(Error::InvalidStep(
                    "give either 'role' or 'selector', not both".into(),
                ))
            }
            (None, None) => {
                return Err(Error::InvalidStep(
                    "target needs a 'role' or a 'selector'".into(),
                ))
            }
        };

        let selection = match (self.index, self.first) {
            (Some(_), true) => {
                return Err(Error::InvalidStep(
                    "'index' and 'first' are mutually exclusive".into(),
                ))
            }
            (Some(n), false) => Selection::Nth(n),
            (None, true) => Selection::First,
            (None, false) => Selection::Unique,
        };

        Ok(Locator {
            strategy,
            selection,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Best-effort rendering of the raw fields; invalid combinations are
        // reported by `locator()` with a clearer message.
        if let Some(role) = self.role {
            write!(f, "role={}", role.as_str())?;
            if let Some(name) = &self.name {
                write!(f, " name=\"{}\"", name)?;
            }
        } else if let Some(selector) = &self.selector {
            write!(f, "css=\"{}\"", selector)?;
        } else {
            write!(f, "<missing target>")?;
        }
        if let Some(n) = self.index {
            write!(f, " nth={}", n)?;
        } else if self.first {
            write!(f, " first")?;
        }
        Ok(())
    }
}
