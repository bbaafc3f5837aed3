//! Error types for swiftcheck setup

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the swiftcheck setup Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before any test case runs
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: \"{sheet}\" in {}", path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
