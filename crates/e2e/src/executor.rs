//! Running a single test case against a translator page

use std::path::PathBuf;
use std::time::Duration;
use swiftcheck_common::{
    normalize, CaseOutcome, EntryMode, ExecutionResult, SuiteConfig, TestCase,
};
use tracing::{debug, warn};

use crate::error::{E2eError, E2eResult};
use crate::page::{LoadState, Page};
use crate::translator::{OutputLocator, TranslatorProfile};

pub const SKIP_EMPTY_INPUT: &str = "empty input in workbook";

/// Drives one case: navigate, enter input, read output, compare
pub struct CaseExecutor {
    base_url: String,
    typing_delay: Duration,
    output: OutputLocator,
    artifacts_dir: Option<PathBuf>,
}

impl CaseExecutor {
    pub fn new(base_url: impl Into<String>, typing_delay: Duration, profile: TranslatorProfile) -> Self {
        Self {
            base_url: base_url.into(),
            typing_delay,
            output: OutputLocator::new(profile),
            artifacts_dir: None,
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        let mut executor = Self::new(
            config.base_url.clone(),
            config.typing_delay(),
            TranslatorProfile::from(&config.profile),
        );
        if config.screenshot_on_failure {
            executor.artifacts_dir = Some(config.artifacts_dir.clone());
        }
        executor
    }

    /// Replace the default output strategies
    pub fn with_output_locator(mut self, output: OutputLocator) -> Self {
        self.output = output;
        self
    }

    /// Capture a screenshot into `dir` whenever a case fails
    pub fn with_failure_screenshots(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    pub fn profile(&self) -> &TranslatorProfile {
        self.output.profile()
    }

    /// Execute `case` on `page`.
    ///
    /// Empty input is a skip, not a failure. A mismatch is still `Ok`: the
    /// verdict lives in the returned result and [`assert_passed`] turns it
    /// into an error.
    pub async fn execute(&self, page: &dyn Page, case: &TestCase) -> E2eResult<CaseOutcome> {
        if let Some(reason) = skip_reason(case) {
            debug!("{}: skipped ({})", case.title(), reason);
            return Ok(CaseOutcome::Skipped {
                id: case.id.clone(),
                name: case.name.clone(),
                reason: reason.to_string(),
            });
        }

        page.goto(&self.base_url, LoadState::DomContentLoaded).await?;

        let profile = self.output.profile();
        let container = profile.find_container(page).await?;
        let input = profile.find_input(page).await?;

        page.fill(&input, "").await?;
        match case.entry_mode {
            EntryMode::Incremental => {
                page.click(&input).await?;
                page.type_text(&input, &case.input, self.typing_delay).await?;
            }
            EntryMode::Instant => page.fill(&input, &case.input).await?,
        }
        debug!("{}: entered input ({})", case.title(), case.entry_mode);

        let actual = self.output.read_output(page, &container).await?;
        let result = ExecutionResult::compare(case, &actual);

        if !result.passed() {
            self.capture_failure(page, case).await;
        }

        Ok(CaseOutcome::Executed(result))
    }

    /// Screenshot `page` into the artifacts directory, if one is set
    pub(crate) async fn capture_failure(&self, page: &dyn Page, case: &TestCase) {
        let Some(dir) = &self.artifacts_dir else {
            return;
        };
        let path = dir.join(format!("{}-{}.png", case.id, case.index));
        if let Err(e) = page.screenshot(&path).await {
            warn!("{}: screenshot failed: {}", case.title(), e);
        }
    }
}

/// Why `case` should not run at all, if it shouldn't
pub fn skip_reason(case: &TestCase) -> Option<&'static str> {
    case.input.is_empty().then_some(SKIP_EMPTY_INPUT)
}

/// Turn a failed verdict into an assertion error carrying both texts
pub fn assert_passed(result: &ExecutionResult) -> E2eResult<()> {
    if result.passed() {
        return Ok(());
    }
    Err(E2eError::AssertionFailed {
        id: result.id.clone(),
        expected: normalize(&result.expected),
        actual: result.actual.clone(),
    })
}
