//! Delimited-text log table importer
//!
//! Turns a header-plus-rows CSV export (e.g. a LAS file dumped to CSV) into a
//! [`LogTable`]. The header row supplies curve names; every following non-blank
//! line is one depth sample.
//!
//! Cell conversion:
//! - numeric text becomes `CellValue::Number`
//! - empty cells, `NaN`, `null`, `-` and the LAS null sentinel become `None`
//! - anything else is kept as `CellValue::Text` (lithology codes, names)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::LAS_NULL_VALUE;
use crate::types::{CellValue, LogRow, LogTable};

/// CSV import errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}: missing header row")]
    MissingHeader(String),

    #[error("{source_name}: duplicate column '{column}'")]
    DuplicateColumn { source_name: String, column: String },
}

/// Importer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Field separator
    pub delimiter: char,
    /// Numeric sentinel read as a missing value (`None` disables the check)
    pub null_value: Option<f64>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            null_value: Some(LAS_NULL_VALUE),
        }
    }
}

/// Load a CSV log table from disk.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<LogTable, TableError> {
    let path = path.as_ref();
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;

    let table = parse_lines(lines.iter().map(String::as_str), options, &path.display().to_string())?;
    tracing::info!(
        file = %path.display(),
        rows = table.len(),
        "Log table loaded"
    );
    Ok(table)
}

/// Parse CSV text already in memory.
pub fn parse_csv_str(contents: &str, options: &CsvOptions) -> Result<LogTable, TableError> {
    parse_lines(contents.lines(), options, "<inline>")
}

fn parse_lines<'a>(
    mut lines: impl Iterator<Item = &'a str>,
    options: &CsvOptions,
    source_name: &str,
) -> Result<LogTable, TableError> {
    let header = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| TableError::MissingHeader(source_name.to_string()))?;

    let columns: Vec<String> = csv_split(header.trim_start_matches('\u{feff}'), options.delimiter)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();
    for (i, col) in columns.iter().enumerate() {
        if columns[..i].contains(col) {
            return Err(TableError::DuplicateColumn {
                source_name: source_name.to_string(),
                column: col.clone(),
            });
        }
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    // header is line 1
    for (line_num, line) in lines.enumerate().map(|(i, l)| (i + 2, l)) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = csv_split(line, options.delimiter);
        if fields.len() > columns.len() {
            if skipped < 10 {
                tracing::warn!(
                    line = line_num,
                    fields = fields.len(),
                    columns = columns.len(),
                    "Row has more fields than header, skipping"
                );
            }
            skipped += 1;
            continue;
        }

        let mut row = LogRow::new();
        for (i, column) in columns.iter().enumerate() {
            let cell = fields.get(i).and_then(|f| parse_cell(f, options.null_value));
            row.set(column, cell);
        }
        rows.push(row);
    }

    if skipped > 0 {
        tracing::warn!(source = source_name, skipped, "Malformed rows skipped");
    }
    Ok(LogTable::new(rows))
}

/// Convert one raw field to a cell; `None` for every missing-value spelling.
fn parse_cell(raw: &str, null_value: Option<f64>) -> Option<CellValue> {
    let s = raw.trim();
    if s.is_empty()
        || s == "-"
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
    {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) if !v.is_finite() => None,
        Ok(v) if null_value.is_some_and(|null| (v - null).abs() < 1e-9) => None,
        Ok(v) => Some(CellValue::Number(v)),
        Err(_) => Some(CellValue::Text(s.to_string())),
    }
}

/// Split a CSV line, honouring double-quoted fields (with `""` escapes).
fn csv_split(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
