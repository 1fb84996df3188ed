//! Locator resolution
//!
//! A locator names a page element by accessibility role (plus optional
//! accessible name and ordinal selection) or by raw CSS selector. Resolution
//! against probed candidates is a pure function, so the executor stays
//! independent of the underlying automation API shape.

use std::fmt;

use serde::Deserialize;

use crate::common::{Error, Result};

/// Accessibility roles understood by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Button,
    Link,
    Textbox,
    Checkbox,
    Heading,
}

impl Role {
    /// CSS selector covering the elements that carry this implicit role
    pub fn css(&self) -> &'static str {
        match self {
            Role::Button => "button, input[type='submit'], input[type='button']",
            Role::Link => "a[href]",
            Role::Textbox => {
                "input[type='text'], input[type='password'], input[type='email'], \
                 input[type='search'], input:not([type]), textarea"
            }
            Role::Checkbox => "input[type='checkbox']",
            Role::Heading => "h1, h2, h3, h4, h5, h6",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
            Role::Textbox => "textbox",
            Role::Checkbox => "checkbox",
            Role::Heading => "heading",
        }
    }
}

/// How to pick among elements matching the strategy
///
/// `Unique` is the strict default: more than one match is an error unless the
/// step names an ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Unique,
    First,
    Nth(usize),
}

/// Element resolution strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Role {
        role: Role,
        name: Option<String>,
        exact: bool,
    },
    Css(String),
}

/// A complete element locator: strategy plus ordinal selection
#[derive(Debug, Clone, PartialEq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selection: Selection,
}

/// Snapshot of one DOM element probed from the page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    /// Visible text (or input value)
    #[serde(default)]
    pub text: String,
    /// Accessible label: aria-label, associated <label>, or placeholder
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub checked: bool,
}

impl Locator {
    pub fn role(role: Role) -> Self {
        Self {
            strategy: Strategy::Role {
                role,
                name: None,
                exact: false,
            },
            selection: Selection::Unique,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css(selector.into()),
            selection: Selection::Unique,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        if let Strategy::Role { name: n, .. } = &mut self.strategy {
            *n = Some(name.into());
        }
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        if let Strategy::Role { exact: e, .. } = &mut self.strategy {
            *e = exact;
        }
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// CSS selector to query the page for candidate elements
    pub fn query(&self) -> &str {
        match &self.strategy {
            Strategy::Role { role, .. } => role.css(),
            Strategy::Css(selector) => selector,
        }
    }

    /// Resolve this locator against probed candidates, returning the index
    /// of the chosen element.
    ///
    /// Fails with `ElementNotFound` when nothing matches and with
    /// `AmbiguousLocator` when several elements match but no ordinal was
    /// given.
    pub fn resolve(&self, candidates: &[Candidate]) -> Result<usize> {
        let matched: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| self.matches(c))
            .map(|(i, _)| i)
            .collect();

        match self.selection {
            Selection::First => matched.first().copied().ok_or_else(|| self.not_found()),
            Selection::Nth(n) => matched.get(n).copied().ok_or_else(|| self.not_found()),
            Selection::Unique => match matched.as_slice() {
                [] => Err(self.not_found()),
                [one] => Ok(*one),
                many => Err(Error::AmbiguousLocator {
                    locator: self.to_string(),
                    count: many.len(),
                }),
            },
        }
    }

    fn matches(&self, candidate: &Candidate) -> bool {
        match &self.strategy {
            Strategy::Css(_) => true,
            Strategy::Role { name, exact, .. } => match name {
                None => true,
                Some(needle) => {
                    name_matches(needle, &candidate.text, *exact)
                        || name_matches(needle, &candidate.label, *exact)
                }
            },
        }
    }

    fn not_found(&self) -> Error {
        Error::ElementNotFound {
            locator: self.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.strategy {
            Strategy::Role { role, name, exact } => {
                write!(f, "role={}", role.as_str())?;
                if let Some(name) = name {
                    write!(f, " name=\"{}\"", name)?;
                    if *exact {
                        write!(f, " exact")?;
                    }
                }
            }
            Strategy::Css(selector) => write!(f, "css=\"{}\"", selector)?,
        }
        match self.selection {
            Selection::Unique => Ok(()),
            Selection::First => write!(f, " first"),
            Selection::Nth(n) => write!(f, " nth={}", n),
        }
    }
}

/// Accessible-name comparison.
///
/// Default is a case-insensitive substring match; `exact` compares whole
/// strings case-sensitively. Both sides are normalized first: runs of Unicode
/// whitespace (including non-breaking and punctuation spaces, which show up
/// in hand-authored labels) collapse to a single ASCII space.
fn name_matches(needle: &str, haystack: &str, exact: bool) -> bool {
    let needle = normalize_whitespace(needle);
    let haystack = normalize_whitespace(haystack);
    if exact {
        haystack == needle
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
