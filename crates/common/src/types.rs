//! Core types for swiftcheck test cases and their results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text::normalize;

/// Identifier prefixes marking UI/behavioral cases
pub const INCREMENTAL_PREFIXES: &[&str] = &["Pos_UI", "Neg_UI"];

/// How the input string is delivered to the translator textbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Keystroke by keystroke with a per-character delay
    Incremental,
    /// Value assigned in one shot
    Instant,
}

impl EntryMode {
    /// Resolve the entry mode from a test case identifier
    pub fn for_id(id: &str) -> Self {
        if INCREMENTAL_PREFIXES.iter().any(|p| id.starts_with(p)) {
            EntryMode::Incremental
        } else {
            EntryMode::Instant
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::Incremental => write!(f, "incremental"),
            EntryMode::Instant => write!(f, "instant"),
        }
    }
}

/// A single row of the test case sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub input_length_type: String,
    pub input: String,
    pub expected_output: String,
    /// Status column as authored in the sheet; informational only
    pub recorded_status: String,
    pub entry_mode: EntryMode,
    /// Position in the loaded sequence
    pub index: usize,
}

impl TestCase {
    pub fn new(
        index: usize,
        id: impl Into<String>,
        name: impl Into<String>,
        input_length_type: impl Into<String>,
        input: impl Into<String>,
        expected_output: impl Into<String>,
        recorded_status: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let entry_mode = EntryMode::for_id(&id);
        Self {
            id,
            name: name.into(),
            input_length_type: input_length_type.into(),
            input: input.into(),
            expected_output: expected_output.into(),
            recorded_status: recorded_status.into(),
            entry_mode,
            index,
        }
    }

    /// Display title, unique even when ids repeat
    pub fn title(&self) -> String {
        format!("{} - {} - {}", self.id, self.name, self.index)
    }
}

/// Pass/fail verdict of an executed case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "Pass"),
            Verdict::Fail => write!(f, "Fail"),
        }
    }
}

/// Outcome of running one case against the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub id: String,
    pub name: String,
    pub input: String,
    /// Expected output as authored in the sheet
    pub expected: String,
    /// Normalized text read from the page
    pub actual: String,
    pub verdict: Verdict,
}

impl ExecutionResult {
    /// Compare normalized actual and expected text and build the result
    pub fn compare(case: &TestCase, actual: &str) -> Self {
        let actual = normalize(actual);
        let verdict = if actual == normalize(&case.expected_output) {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        Self {
            id: case.id.clone(),
            name: case.name.clone(),
            input: case.input.clone(),
            expected: case.expected_output.clone(),
            actual,
            verdict,
        }
    }

    /// A failed result for a case that never produced output
    pub fn failed(case: &TestCase) -> Self {
        Self {
            id: case.id.clone(),
            name: case.name.clone(),
            input: case.input.clone(),
            expected: case.expected_output.clone(),
            actual: String::new(),
            verdict: Verdict::Fail,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// What happened to a case during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    Executed(ExecutionResult),
    Skipped {
        id: String,
        name: String,
        reason: String,
    },
}

impl CaseOutcome {
    pub fn id(&self) -> &str {
        match self {
            CaseOutcome::Executed(result) => &result.id,
            CaseOutcome::Skipped { id, .. } => id,
        }
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            CaseOutcome::Executed(result) => Some(result),
            CaseOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CaseOutcome::Skipped { .. })
    }
}
