//! Page abstraction the translator checks are written against

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::E2eResult;
use crate::locator::Locator;

/// Navigation milestone to wait for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// DOM parsed; scripts and images may still be loading
    #[default]
    DomContentLoaded,
    Load,
    NetworkIdle,
}

/// One browser tab in its own context.
///
/// Every call is a single, non-waiting query or action; waiting is done by
/// the caller with bounded polls (see [`crate::wait`]).
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str, wait_until: LoadState) -> E2eResult<()>;

    /// False when nothing matches
    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool>;

    async fn count(&self, locator: &Locator) -> E2eResult<usize>;

    /// Rendered text of the matched element; errors when nothing matches
    async fn inner_text(&self, locator: &Locator) -> E2eResult<String>;

    /// Replace the value of an input in one step
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    /// Send keystrokes one character at a time
    async fn type_text(&self, locator: &Locator, text: &str, delay: Duration) -> E2eResult<()>;

    async fn screenshot(&self, path: &Path) -> E2eResult<()>;

    async fn close(&self) -> E2eResult<()>;
}

/// Hands out pages, each in a fresh isolated browser context
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn open_page(&self) -> E2eResult<Box<dyn Page>>;
}
