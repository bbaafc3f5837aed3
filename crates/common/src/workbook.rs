//! Loading test cases from the `.xlsx` workbook

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::text::clean_key;
use crate::types::TestCase;

pub const COL_TC_ID: &str = "TC ID";
pub const COL_NAME: &str = "Test case name";
pub const COL_LENGTH_TYPE: &str = "Input length type";
pub const COL_INPUT: &str = "Input";
pub const COL_EXPECTED: &str = "Expected output";
pub const COL_STATUS: &str = "Status";

/// Where the test cases live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookSource {
    pub path: PathBuf,

    /// Sheet name, matched exactly (whitespace included)
    pub sheet: String,

    /// Zero-based row holding the column names; rows above it are notes
    pub header_row: usize,
}

impl Default for WorkbookSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/IT23355446-Test_cases.xlsx"),
            // the sheet really is authored with a leading space
            sheet: " Test cases".to_string(),
            header_row: 4,
        }
    }
}

/// Load every runnable test case from the workbook
pub fn load_test_cases(source: &WorkbookSource) -> Result<Vec<TestCase>> {
    let grid = read_sheet(&source.path, &source.sheet)?;
    let cases = parse_rows(&grid, source.header_row);

    info!(
        "Loaded {} test case(s) from \"{}\" in {}",
        cases.len(),
        source.sheet,
        source.path.display()
    );
    Ok(cases)
}

/// Read a sheet into a dense grid of cell strings
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(Error::WorkbookNotFound(path.to_path_buf()));
    }

    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| Error::Workbook(format!("{}: {}", path.display(), e)))?;

    let worksheet = match book
        .get_sheet_collection()
        .iter()
        .find(|ws| ws.get_name() == sheet)
    {
        Some(ws) => ws,
        None => {
            let available: Vec<&str> = book
                .get_sheet_collection()
                .iter()
                .map(|ws| ws.get_name())
                .collect();
            warn!("Available sheets: {:?}", available);
            return Err(Error::SheetNotFound {
                sheet: sheet.to_string(),
                path: path.to_path_buf(),
            });
        }
    };

    let (max_col, max_row) = worksheet.get_highest_column_and_row();
    debug!("Sheet \"{}\" spans {} column(s) x {} row(s)", sheet, max_col, max_row);

    let grid = (1..=max_row)
        .map(|row| {
            (1..=max_col)
                .map(|col| worksheet.get_value((col, row)))
                .collect()
        })
        .collect();

    Ok(grid)
}

/// Map grid rows below the header to test cases, keyed by cleaned column name.
///
/// Rows with an empty `TC ID` or `Test case name` are separators and are dropped.
pub fn parse_rows(grid: &[Vec<String>], header_row: usize) -> Vec<TestCase> {
    let Some(header) = grid.get(header_row) else {
        warn!("Header row {} is past the end of the sheet", header_row + 1);
        return Vec::new();
    };

    // a repeated column name resolves to its first occurrence
    let mut columns: HashMap<String, usize> = HashMap::new();
    for (i, name) in header.iter().enumerate() {
        let key = clean_key(name);
        if !key.is_empty() {
            columns.entry(key).or_insert(i);
        }
    }

    for required in [COL_TC_ID, COL_NAME, COL_INPUT, COL_EXPECTED] {
        if !columns.contains_key(required) {
            warn!("Column \"{}\" not found in header; values default to empty", required);
        }
    }

    let cell = |row: &[String], column: &str| -> String {
        columns
            .get(column)
            .and_then(|&i| row.get(i))
            .cloned()
            .unwrap_or_default()
    };

    let mut cases = Vec::new();
    for row in grid.iter().skip(header_row + 1) {
        let id = clean_key(&cell(row, COL_TC_ID));
        let name = clean_key(&cell(row, COL_NAME));
        if id.is_empty() || name.is_empty() {
            continue;
        }

        cases.push(TestCase::new(
            cases.len(),
            id,
            name,
            clean_key(&cell(row, COL_LENGTH_TYPE)),
            cell(row, COL_INPUT).trim(),
            cell(row, COL_EXPECTED).trim(),
            cell(row, COL_STATUS).trim(),
        ));
    }

    cases
}
