//! Suite runner: every case on its own page, results flushed once at the end

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use swiftcheck_common::{
    load_test_cases, CaseOutcome, ExecutionResult, ResultSink, ResultsCollector, RunSummary,
    SuiteConfig, TestCase,
};
use tracing::{debug, error, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::executor::{assert_passed, skip_reason, CaseExecutor};
use crate::page::PageSource;

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub duration_ms: u64,
    pub results_path: PathBuf,
}

impl SuiteReport {
    /// True when no executed case failed
    pub fn success(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Load the cases named by `config`.
///
/// Runs before any browser is launched so a bad workbook aborts the run
/// without touching the results file.
pub fn load_cases(config: &SuiteConfig) -> E2eResult<Vec<TestCase>> {
    Ok(load_test_cases(&config.workbook)?)
}

/// Keep only cases whose id contains `filter`
pub fn select_cases(cases: Vec<TestCase>, filter: Option<&str>) -> Vec<TestCase> {
    match filter {
        Some(pattern) if !pattern.is_empty() => cases
            .into_iter()
            .filter(|case| case.id.contains(pattern))
            .collect(),
        _ => cases,
    }
}

pub struct SuiteRunner<S> {
    source: S,
    executor: CaseExecutor,
    sink: ResultSink,
    workers: usize,
    case_timeout: Duration,
}

impl<S: PageSource> SuiteRunner<S> {
    pub fn new(source: S, config: &SuiteConfig) -> Self {
        Self {
            source,
            executor: CaseExecutor::from_config(config),
            sink: ResultSink::new(config.results_path.clone()),
            workers: config.workers.max(1),
            case_timeout: config.case_timeout(),
        }
    }

    /// Swap in a custom executor, e.g. one with different output strategies
    pub fn with_executor(mut self, executor: CaseExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run every case and write the results file.
    ///
    /// A failing case never stops the others; the file is written once,
    /// after the last case, whatever the verdicts.
    pub async fn run(&self, cases: &[TestCase]) -> E2eResult<SuiteReport> {
        let start = Instant::now();
        info!(
            "Running {} case(s) with {} worker(s)",
            cases.len(),
            self.workers
        );

        let collector = stream::iter(cases)
            .map(|case| self.run_case(case))
            .buffer_unordered(self.workers)
            .fold(ResultsCollector::new(), |mut collector, outcome| async move {
                log_outcome(&outcome);
                collector.record(outcome);
                collector
            })
            .await;

        let results_path = self.sink.flush(collector.results())?;
        let summary = collector.summary();
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Finished in {} ms: {} passed, {} failed, {} skipped",
            duration_ms, summary.passed, summary.failed, summary.skipped
        );

        Ok(SuiteReport {
            summary,
            duration_ms,
            results_path,
        })
    }

    async fn run_case(&self, case: &TestCase) -> CaseOutcome {
        if let Some(reason) = skip_reason(case) {
            return CaseOutcome::Skipped {
                id: case.id.clone(),
                name: case.name.clone(),
                reason: reason.to_string(),
            };
        }

        match self.try_run_case(case).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}: {}", case.title(), e);
                CaseOutcome::Executed(ExecutionResult::failed(case))
            }
        }
    }

    async fn try_run_case(&self, case: &TestCase) -> E2eResult<CaseOutcome> {
        debug!("{}: opening page", case.title());
        let page = self.source.open_page().await?;

        let outcome = tokio::time::timeout(self.case_timeout, self.executor.execute(page.as_ref(), case))
            .await
            .unwrap_or_else(|_| {
                Err(E2eError::CaseTimeout {
                    id: case.id.clone(),
                    seconds: self.case_timeout.as_secs(),
                })
            });

        if outcome.is_err() {
            self.executor.capture_failure(page.as_ref(), case).await;
        }
        if let Err(e) = page.close().await {
            warn!("{}: closing page failed: {}", case.title(), e);
        }
        outcome
    }
}

fn log_outcome(outcome: &CaseOutcome) {
    match outcome {
        CaseOutcome::Executed(result) => match assert_passed(result) {
            Ok(()) => info!("✓ {} - {}", result.id, result.name),
            Err(e) => info!("✗ {} - {}: {}", result.id, result.name, e),
        },
        CaseOutcome::Skipped { id, name, reason } => info!("- {} - {} ({})", id, name, reason),
    }
}
