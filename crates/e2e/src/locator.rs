//! Locator chains
//!
//! A [`Locator`] is plain data: an ordered list of steps that the page
//! implementation resolves, each step narrowing or moving the current
//! element set. Keeping it serializable lets the same chain be sent to the
//! Playwright driver or evaluated against an in-memory page.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocatorStep {
    /// Descendants with an ARIA role whose accessible name contains `name` (case-insensitive)
    Role { role: String, name: String },

    /// Descendants whose text is `text` (exact) or contains it (case-insensitive)
    Text { text: String, exact: bool },

    /// Descendants matching a CSS selector list
    Css { selector: String },

    /// Structural parent
    Parent,

    /// Next element sibling
    FollowingSibling,

    First,

    Nth { index: usize },

    /// Keep elements that contain no descendant matching `inner`
    HasNot { inner: Locator },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub steps: Vec<LocatorStep>,
}

impl Locator {
    /// Empty chain; resolves to the document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::root().get_by_role(role, name)
    }

    pub fn text(text: impl Into<String>, exact: bool) -> Self {
        Self::root().get_by_text(text, exact)
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::root().locator(selector)
    }

    fn push(mut self, step: LocatorStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn get_by_role(self, role: impl Into<String>, name: impl Into<String>) -> Self {
        self.push(LocatorStep::Role {
            role: role.into(),
            name: name.into(),
        })
    }

    pub fn get_by_text(self, text: impl Into<String>, exact: bool) -> Self {
        self.push(LocatorStep::Text {
            text: text.into(),
            exact,
        })
    }

    pub fn locator(self, selector: impl Into<String>) -> Self {
        self.push(LocatorStep::Css {
            selector: selector.into(),
        })
    }

    pub fn parent(self) -> Self {
        self.push(LocatorStep::Parent)
    }

    pub fn following_sibling(self) -> Self {
        self.push(LocatorStep::FollowingSibling)
    }

    pub fn first(self) -> Self {
        self.push(LocatorStep::First)
    }

    pub fn nth(self, index: usize) -> Self {
        self.push(LocatorStep::Nth { index })
    }

    pub fn has_not(self, inner: Locator) -> Self {
        self.push(LocatorStep::HasNot { inner })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, ":root");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            match step {
                LocatorStep::Role { role, name } => write!(f, "role={}[name~={:?}]", role, name)?,
                LocatorStep::Text { text, exact: true } => write!(f, "text={:?}", text)?,
                LocatorStep::Text { text, exact: false } => write!(f, "text~={:?}", text)?,
                LocatorStep::Css { selector } => write!(f, "css={}", selector)?,
                LocatorStep::Parent => write!(f, "..")?,
                LocatorStep::FollowingSibling => write!(f, "+*")?,
                LocatorStep::First => write!(f, "first")?,
                LocatorStep::Nth { index } => write!(f, "nth={}", index)?,
                LocatorStep::HasNot { inner } => write!(f, "has-not({})", inner)?,
            }
        }
        Ok(())
    }
}
