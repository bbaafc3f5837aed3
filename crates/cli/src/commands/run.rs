//! Run the suite against the live translator

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use swiftcheck_common::{BrowserKind, SuiteConfig};
use swiftcheck_e2e::{load_cases, select_cases, PlaywrightDriver, SuiteRunner};
use tracing::warn;

use super::SourceArgs;
use crate::output::{print_error, print_success, print_summary, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Results JSON path
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Cases executed at once
    #[arg(long)]
    pub workers: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Browser engine
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    /// Translator URL
    #[arg(long, env = "SWIFTCHECK_BASE_URL")]
    pub base_url: Option<String>,
}

impl RunArgs {
    pub fn apply(&self, config: &mut SuiteConfig) {
        self.source.apply(config);
        if let Some(path) = &self.results {
            config.results_path = path.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(kind) = self.browser {
            config.browser.kind = kind;
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
    }
}

/// Returns true when every executed case passed
pub async fn execute(args: RunArgs, mut config: SuiteConfig, format: OutputFormat) -> Result<bool> {
    args.apply(&mut config);
    config.validate()?;

    // a broken workbook must fail before a browser is started
    let cases = select_cases(load_cases(&config)?, args.source.filter.as_deref());
    if cases.is_empty() {
        warn!("No cases selected");
    }

    let driver = PlaywrightDriver::launch(&config.browser).await?;
    let runner = SuiteRunner::new(driver, &config);
    let report = runner.run(&cases).await;

    if let Err(e) = runner.source().shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }
    let report = report?;

    print_summary(&report.summary, format);
    if format != OutputFormat::Json {
        if report.success() {
            print_success(&format!("Results saved to {}", report.results_path.display()));
        } else {
            print_error(&format!(
                "{} case(s) failed; see {}",
                report.summary.failed,
                report.results_path.display()
            ));
        }
    }
    Ok(report.success())
}
