//! Run results: the in-memory collector and the JSON results file

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::types::{CaseOutcome, ExecutionResult, Verdict};

/// One entry of the results file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub tc_id: String,
    pub name: String,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub status: Verdict,
}

impl From<&ExecutionResult> for ResultRecord {
    fn from(result: &ExecutionResult) -> Self {
        Self {
            tc_id: result.id.clone(),
            name: result.name.clone(),
            input: result.input.clone(),
            expected: result.expected.clone(),
            actual: result.actual.clone(),
            status: result.verdict,
        }
    }
}

/// Envelope written once at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsFile {
    #[serde(with = "iso_millis")]
    pub executed_at: DateTime<Utc>,
    pub results: Vec<ResultRecord>,
}

impl ResultsFile {
    pub fn new(results: &[ExecutionResult]) -> Self {
        Self {
            executed_at: Utc::now(),
            results: results.iter().map(ResultRecord::from).collect(),
        }
    }

    /// Read a results file written by a previous run
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.status == Verdict::Pass).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.status == Verdict::Fail).count()
    }
}

/// ISO-8601 timestamps with millisecond precision, e.g. `2026-01-02T03:04:05.678Z`
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Writes the results file
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all results, replacing any earlier run's file
    pub fn flush(&self, results: &[ExecutionResult]) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = ResultsFile::new(results);
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)?;

        info!("Saved {}", self.path.display());
        Ok(self.path.clone())
    }
}

/// A case that was not executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCase {
    pub id: String,
    pub name: String,
    pub reason: String,
}

/// Append-only accumulator of case outcomes for a single run
#[derive(Debug, Default)]
pub struct ResultsCollector {
    results: Vec<ExecutionResult>,
    skipped: Vec<SkippedCase>,
}

impl ResultsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: CaseOutcome) {
        match outcome {
            CaseOutcome::Executed(result) => self.results.push(result),
            CaseOutcome::Skipped { id, name, reason } => {
                self.skipped.push(SkippedCase { id, name, reason })
            }
        }
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn skipped(&self) -> &[SkippedCase] {
        &self.skipped
    }

    pub fn summary(&self) -> RunSummary {
        let passed = self.results.iter().filter(|r| r.passed()).count();
        RunSummary {
            total: self.results.len() + self.skipped.len(),
            passed,
            failed: self.results.len() - passed,
            skipped: self.skipped.len(),
        }
    }
}

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}
