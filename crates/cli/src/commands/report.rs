//! Show a results file from an earlier run

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use swiftcheck_common::{ResultsFile, RunSummary, SuiteConfig};

use crate::output::{print_info, print_list, print_summary, OutputFormat};

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Results file; defaults to the configured one
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Only show failed cases
    #[arg(long)]
    pub failed: bool,
}

/// Returns true when the file holds no failures
pub fn execute(args: ReportArgs, config: SuiteConfig, format: OutputFormat) -> Result<bool> {
    let path = args.results.unwrap_or(config.results_path);
    let file = ResultsFile::read(&path)
        .with_context(|| format!("reading results file {}", path.display()))?;

    if format != OutputFormat::Json {
        print_info(&format!(
            "{} (executed at {})",
            path.display(),
            file.executed_at.to_rfc3339()
        ));
    }

    let records: Vec<_> = file
        .results
        .iter()
        .filter(|r| !args.failed || r.status == swiftcheck_common::Verdict::Fail)
        .cloned()
        .collect();
    print_list(&records, format);

    let summary = RunSummary {
        total: file.results.len(),
        passed: file.passed(),
        failed: file.failed(),
        skipped: 0,
    };
    if format != OutputFormat::Json {
        print_summary(&summary, format);
    }
    Ok(summary.failed == 0)
}
