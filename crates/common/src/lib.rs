//! swiftcheck common library
//!
//! Test case model, text normalization, workbook loading, suite
//! configuration and the results file shared by the runner and the CLI.

pub mod config;
pub mod error;
pub mod report;
pub mod text;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use config::{BrowserConfig, BrowserKind, ProfileConfig, SuiteConfig};
pub use error::{Error, Result};
pub use report::{ResultRecord, ResultSink, ResultsCollector, ResultsFile, RunSummary, SkippedCase};
pub use text::{clean_key, normalize, ScriptBlock};
pub use types::*;
pub use workbook::{load_test_cases, WorkbookSource};

/// swiftcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
