//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use swiftcheck_common::{ResultRecord, RunSummary, TestCase, Verdict};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for TestCase {
    fn headers() -> Vec<&'static str> {
        vec!["TC ID", "Name", "Length", "Entry", "Input", "Expected"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.input_length_type.clone(),
            self.entry_mode.to_string(),
            self.input.clone(),
            self.expected_output.clone(),
        ]
    }
}

impl TableDisplay for ResultRecord {
    fn headers() -> Vec<&'static str> {
        vec!["TC ID", "Name", "Status", "Expected", "Actual"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.tc_id.clone(),
            self.name.clone(),
            status_label(self.status),
            self.expected.clone(),
            self.actual.clone(),
        ]
    }
}

fn status_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Pass => "Pass".green().to_string(),
        Verdict::Fail => "Fail".red().to_string(),
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && format != OutputFormat::Json {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }

            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                let row = item.row();
                for (header, value) in T::headers().iter().zip(row.iter()) {
                    println!("{}: {}", header, value);
                }
            }
        }
    }
}

/// Print the pass/fail counts of a run
pub fn print_summary(summary: &RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
        }
        _ => {
            println!(
                "{} total, {} passed, {} failed, {} skipped",
                summary.total,
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.skipped
            );
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}
