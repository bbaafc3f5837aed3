//! Finding the translator widgets and reading the translated text
//!
//! The page has no stable id for the output region, so it is found by
//! triangulation: the swap-languages button sits between both panels, the
//! output panel is the parent of the target-language heading, and the
//! translation is normally the heading's next sibling. When that sibling
//! never shows target-script text, the whole panel is scanned instead.

use async_trait::async_trait;
use std::time::Duration;
use swiftcheck_common::{normalize, ProfileConfig, ScriptBlock};
use tracing::{debug, warn};

use crate::error::E2eResult;
use crate::locator::Locator;
use crate::page::Page;
use crate::wait::{poll, wait_visible};

/// Elements that may carry the translated text
pub const CANDIDATE_SELECTOR: &str = "div, span, p, pre, textarea, [role='textbox']";

/// Interactive controls whose labels must never be read as output
pub const CONTROL_SELECTOR: &str = "button";

/// Everything under `panel` that could hold the output, excluding controls
pub fn output_candidates(panel: &Locator) -> Locator {
    panel
        .clone()
        .locator(CANDIDATE_SELECTOR)
        .has_not(Locator::css(CONTROL_SELECTOR))
}

/// Locators and timing for one translator page layout
#[derive(Debug, Clone)]
pub struct TranslatorProfile {
    pub swap_button: String,
    pub input_label: String,
    pub target_language: String,
    pub script: ScriptBlock,
    pub visibility_timeout: Duration,
    pub sibling_timeout: Duration,
    pub scan_timeout: Duration,
    pub max_candidates: usize,
    pub poll_interval: Duration,
}

impl From<&ProfileConfig> for TranslatorProfile {
    fn from(config: &ProfileConfig) -> Self {
        Self {
            swap_button: config.swap_button.clone(),
            input_label: config.input_label.clone(),
            target_language: config.target_language.clone(),
            script: config.script,
            visibility_timeout: Duration::from_millis(config.visibility_timeout_ms),
            sibling_timeout: Duration::from_millis(config.sibling_timeout_ms),
            scan_timeout: Duration::from_millis(config.scan_timeout_ms),
            max_candidates: config.max_candidates,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

impl Default for TranslatorProfile {
    fn default() -> Self {
        Self::from(&ProfileConfig::default())
    }
}

impl TranslatorProfile {
    pub fn swap_button(&self) -> Locator {
        Locator::role("button", &self.swap_button)
    }

    /// Two levels above the swap button; holds both panels
    pub fn container(&self) -> Locator {
        self.swap_button().parent().parent()
    }

    pub fn input(&self) -> Locator {
        Locator::role("textbox", &self.input_label)
    }

    pub fn heading(&self, container: &Locator) -> Locator {
        container
            .clone()
            .get_by_text(&self.target_language, true)
            .first()
    }

    pub fn output_panel(&self, container: &Locator) -> Locator {
        self.heading(container).parent()
    }

    /// Wait for the swap control and return the container above it
    pub async fn find_container(&self, page: &dyn Page) -> E2eResult<Locator> {
        wait_visible(page, &self.swap_button(), self.visibility_timeout, self.poll_interval).await?;
        let container = self.container();
        wait_visible(page, &container, self.visibility_timeout, self.poll_interval).await?;
        Ok(container)
    }

    /// Wait for the input textbox
    pub async fn find_input(&self, page: &dyn Page) -> E2eResult<Locator> {
        let input = self.input();
        wait_visible(page, &input, self.visibility_timeout, self.poll_interval).await?;
        Ok(input)
    }
}

/// Structural anchors inside the output panel, shared by all strategies
#[derive(Debug, Clone)]
pub struct OutputAnchor {
    pub heading: Locator,
    pub panel: Locator,
}

/// One way of pulling translated text out of the output panel.
///
/// `Ok(None)` means the strategy gave up within its time budget and the next
/// one should be tried.
#[async_trait]
pub trait OutputStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, page: &dyn Page, anchor: &OutputAnchor) -> E2eResult<Option<String>>;
}

/// The element right after the target-language heading
pub struct HeadingSibling {
    pub script: ScriptBlock,
    pub timeout: Duration,
    pub interval: Duration,
}

#[async_trait]
impl OutputStrategy for HeadingSibling {
    fn name(&self) -> &'static str {
        "heading-sibling"
    }

    async fn extract(&self, page: &dyn Page, anchor: &OutputAnchor) -> E2eResult<Option<String>> {
        let sibling = anchor.heading.clone().following_sibling();
        let sibling = &sibling;
        let script = self.script;

        let text = poll(self.timeout, self.interval, move || async move {
            match page.inner_text(sibling).await {
                Ok(text) if script.matches(&text) => Some(normalize(&text)),
                _ => None,
            }
        })
        .await;

        Ok(text)
    }
}

/// Scan the panel and keep the longest target-script text
pub struct PanelScan {
    pub script: ScriptBlock,
    pub timeout: Duration,
    pub interval: Duration,
    pub max_candidates: usize,
}

impl PanelScan {
    /// One pass over at most `max_candidates` elements
    pub async fn best_candidate(&self, page: &dyn Page, candidates: &Locator) -> String {
        let count = match page.count(candidates).await {
            Ok(count) => count,
            Err(e) => {
                debug!("Counting candidates failed: {}", e);
                return String::new();
            }
        };

        let mut best = String::new();
        for i in 0..count.min(self.max_candidates) {
            let text = page
                .inner_text(&candidates.clone().nth(i))
                .await
                .map(|t| normalize(&t))
                .unwrap_or_default();
            if self.script.matches(&text) && text.chars().count() > best.chars().count() {
                best = text;
            }
        }
        best
    }
}

#[async_trait]
impl OutputStrategy for PanelScan {
    fn name(&self) -> &'static str {
        "panel-scan"
    }

    async fn extract(&self, page: &dyn Page, anchor: &OutputAnchor) -> E2eResult<Option<String>> {
        let candidates = output_candidates(&anchor.panel);
        let candidates = &candidates;

        poll(self.timeout, self.interval, move || async move {
            let best = self.best_candidate(page, candidates).await;
            (!best.is_empty()).then_some(best)
        })
        .await;

        // the page may still be settling; take a final look either way
        let best = self.best_candidate(page, candidates).await;
        Ok((!best.is_empty()).then_some(best))
    }
}

/// Tries output strategies in order and returns the first text found
pub struct OutputLocator {
    profile: TranslatorProfile,
    strategies: Vec<Box<dyn OutputStrategy>>,
}

impl OutputLocator {
    /// Heading sibling first, then the panel-wide scan
    pub fn new(profile: TranslatorProfile) -> Self {
        let strategies: Vec<Box<dyn OutputStrategy>> = vec![
            Box::new(HeadingSibling {
                script: profile.script,
                timeout: profile.sibling_timeout,
                interval: profile.poll_interval,
            }),
            Box::new(PanelScan {
                script: profile.script,
                timeout: profile.scan_timeout,
                interval: profile.poll_interval,
                max_candidates: profile.max_candidates,
            }),
        ];
        Self::with_strategies(profile, strategies)
    }

    pub fn with_strategies(profile: TranslatorProfile, strategies: Vec<Box<dyn OutputStrategy>>) -> Self {
        Self { profile, strategies }
    }

    pub fn profile(&self) -> &TranslatorProfile {
        &self.profile
    }

    /// Read the translated text below the target-language heading.
    ///
    /// Returns an empty string when every strategy comes up empty; only a
    /// missing output panel is an error.
    pub async fn read_output(&self, page: &dyn Page, container: &Locator) -> E2eResult<String> {
        let anchor = OutputAnchor {
            heading: self.profile.heading(container),
            panel: self.profile.output_panel(container),
        };
        wait_visible(
            page,
            &anchor.panel,
            self.profile.visibility_timeout,
            self.profile.poll_interval,
        )
        .await?;

        for strategy in &self.strategies {
            debug!("Trying output strategy {}", strategy.name());
            if let Some(text) = strategy.extract(page, &anchor).await? {
                debug!("Output found by {}: {:?}", strategy.name(), text);
                return Ok(text);
            }
            warn!("Output strategy {} found nothing", strategy.name());
        }

        Ok(String::new())
    }
}
