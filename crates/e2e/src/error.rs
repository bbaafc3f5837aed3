//! Error types for browser-driven checks

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Setup error: {0}")]
    Setup(#[from] swiftcheck_common::Error),

    #[error("Node.js not found. Install Node.js and run: npm install playwright && npx playwright install")]
    DriverNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Playwright driver exited")]
    DriverClosed,

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Case {id} timed out after {seconds}s")]
    CaseTimeout { id: String, seconds: u64 },

    #[error("Assertion failed for {id}: expected {expected:?}, got {actual:?}")]
    AssertionFailed {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
