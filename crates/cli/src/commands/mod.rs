//! CLI subcommands

pub mod list;
pub mod report;
pub mod run;

use clap::Args;
use std::path::PathBuf;
use swiftcheck_common::SuiteConfig;

/// Where cases come from; shared by `run` and `list`
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Workbook path
    #[arg(long, env = "SWIFTCHECK_WORKBOOK")]
    pub workbook: Option<PathBuf>,

    /// Sheet name, matched exactly
    #[arg(long)]
    pub sheet: Option<String>,

    /// Only cases whose id contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut SuiteConfig) {
        if let Some(path) = &self.workbook {
            config.workbook.path = path.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.workbook.sheet = sheet.clone();
        }
    }
}
