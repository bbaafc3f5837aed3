//! List the cases a run would execute

use anyhow::Result;
use swiftcheck_common::SuiteConfig;
use swiftcheck_e2e::{load_cases, select_cases};

use super::SourceArgs;
use crate::output::{print_list, OutputFormat};

pub fn execute(args: SourceArgs, mut config: SuiteConfig, format: OutputFormat) -> Result<()> {
    args.apply(&mut config);
    let cases = select_cases(load_cases(&config)?, args.filter.as_deref());
    print_list(&cases, format);
    Ok(())
}
