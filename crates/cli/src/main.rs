//! swiftcheck CLI - Main Entry Point
//!
//! Runs workbook-driven checks against a Singlish to Sinhala translator,
//! lists the loaded cases and shows earlier results.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use swiftcheck_common::SuiteConfig;

mod commands;
mod output;

use commands::{list, report, run};

/// Exit code when any executed case failed
const EXIT_FAILED: u8 = 1;

/// Exit code for setup problems: bad config, unreadable workbook, no browser
const EXIT_SETUP: u8 = 2;

/// swiftcheck - translator checks driven by a test case workbook
#[derive(Parser)]
#[command(name = "swiftcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Suite configuration file (TOML); defaults apply when missing
    #[arg(long, default_value = "swiftcheck.toml", env = "SWIFTCHECK_CONFIG", global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite and write the results file
    Run(run::RunArgs),

    /// List the cases loaded from the workbook
    List(commands::SourceArgs),

    /// Show a results file
    Report(report::ReportArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match dispatch(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILED),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::from(EXIT_SETUP)
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let config = SuiteConfig::load(&cli.config)?;

    match cli.command {
        Commands::Run(args) => run::execute(args, config, cli.format).await,
        Commands::List(args) => list::execute(args, config, cli.format).map(|_| true),
        Commands::Report(args) => report::execute(args, config, cli.format),
        Commands::Version => {
            println!("swiftcheck v{}", env!("CARGO_PKG_VERSION"));
            println!("Target: {}", SuiteConfig::default().base_url);
            Ok(true)
        }
    }
}
