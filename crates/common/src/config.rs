//! Suite configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::text::ScriptBlock;
use crate::workbook::WorkbookSource;

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Translator application URL
    pub base_url: String,

    /// Test case workbook
    pub workbook: WorkbookSource,

    /// Results JSON file
    pub results_path: PathBuf,

    /// Directory for failure screenshots
    pub artifacts_dir: PathBuf,

    /// Per-character delay for incremental entry
    pub typing_delay_ms: u64,

    /// Upper bound for a whole case
    pub case_timeout_ms: u64,

    /// Concurrently executing cases
    pub workers: usize,

    /// Capture a screenshot when a case fails
    pub screenshot_on_failure: bool,

    /// Browser launch settings
    pub browser: BrowserConfig,

    /// Translator page contract
    pub profile: ProfileConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.swifttranslator.com/".to_string(),
            workbook: WorkbookSource::default(),
            results_path: PathBuf::from("results/test-results.json"),
            artifacts_dir: PathBuf::from("results/artifacts"),
            typing_delay_ms: 20,
            case_timeout_ms: 90_000,
            workers: 1,
            screenshot_on_failure: true,
            browser: BrowserConfig::default(),
            profile: ProfileConfig::default(),
        }
    }
}

/// Browser engine to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub kind: BrowserKind,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub navigation_timeout_ms: u64,
    pub action_timeout_ms: u64,

    /// Directory `node` runs in; must be able to resolve the `playwright` package
    pub node_project_dir: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout_ms: 60_000,
            action_timeout_ms: 60_000,
            node_project_dir: PathBuf::from("."),
        }
    }
}

/// What the translator page is expected to look like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Accessible name of the swap-languages button
    pub swap_button: String,

    /// Accessible name of the input textbox
    pub input_label: String,

    /// Exact heading text above the output panel
    pub target_language: String,

    pub script: ScriptBlock,
    pub visibility_timeout_ms: u64,
    pub sibling_timeout_ms: u64,
    pub scan_timeout_ms: u64,
    pub max_candidates: usize,
    pub poll_interval_ms: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            swap_button: "Swap Languages".to_string(),
            input_label: "Input Your Singlish Text Here".to_string(),
            target_language: "Sinhala".to_string(),
            script: ScriptBlock::SINHALA,
            visibility_timeout_ms: 20_000,
            sibling_timeout_ms: 8_000,
            scan_timeout_ms: 25_000,
            max_candidates: 25,
            poll_interval_ms: 100,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from a TOML file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if self.profile.max_candidates == 0 {
            return Err(Error::InvalidConfig("max_candidates must be at least 1".into()));
        }
        if self.profile.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig("poll_interval_ms must be positive".into()));
        }
        if self.base_url.is_empty() {
            return Err(Error::InvalidConfig("base_url is empty".into()));
        }
        Ok(())
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn case_timeout(&self) -> Duration {
        Duration::from_millis(self.case_timeout_ms)
    }
}
