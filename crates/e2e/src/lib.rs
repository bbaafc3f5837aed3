//! Browser-driven checks for a Singlish to Sinhala translator
//!
//! Test cases come from a workbook (see `swiftcheck_common::workbook`); each
//! one is typed into the live translator page and the rendered Sinhala
//! output is compared with the expected text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SuiteRunner                                                │
//! │    ├── PageSource::open_page() -> Box<dyn Page>             │
//! │    ├── CaseExecutor::execute(page, case) -> CaseOutcome     │
//! │    │     ├── TranslatorProfile  (container, input, heading) │
//! │    │     └── OutputLocator                                  │
//! │    │           ├── HeadingSibling   (primary)               │
//! │    │           └── PanelScan        (fallback)              │
//! │    └── ResultSink::flush(results)   (once, at the end)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver: node + playwright over JSON lines        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod executor;
pub mod locator;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod translator;
pub mod wait;

pub use error::{E2eError, E2eResult};
pub use executor::{assert_passed, CaseExecutor};
pub use locator::{Locator, LocatorStep};
pub use page::{LoadState, Page, PageSource};
pub use playwright::PlaywrightDriver;
pub use runner::{load_cases, select_cases, SuiteReport, SuiteRunner};
pub use translator::{OutputLocator, OutputStrategy, TranslatorProfile};
