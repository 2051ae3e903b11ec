//! Well-log table types: `CellValue`, `LogRow`, `LogTable`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single cell of a log table.
///
/// Curves are numeric; label columns in reference tables may hold either
/// numbers or free text (e.g. `"Sand"`, `3`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric value if this is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One depth sample: curve name to optional reading.
///
/// `None` (or an absent key) means the tool did not record a value at this
/// depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRow {
    cells: BTreeMap<String, Option<CellValue>>,
}

impl LogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style numeric insert, mostly for tests and importers.
    pub fn with(mut self, curve: &str, value: Option<f64>) -> Self {
        self.set(curve, value.map(CellValue::Number));
        self
    }

    /// Builder-style insert for label columns.
    pub fn with_cell(mut self, curve: &str, value: Option<CellValue>) -> Self {
        self.set(curve, value);
        self
    }

    pub fn set(&mut self, curve: &str, value: Option<CellValue>) {
        self.cells.insert(curve.to_string(), value);
    }

    /// Raw cell, `None` when the key is absent or null.
    pub fn get(&self, curve: &str) -> Option<&CellValue> {
        self.cells.get(curve).and_then(Option::as_ref)
    }

    /// Finite numeric reading; absent, null, text and NaN/Inf all count as missing.
    pub fn number(&self, curve: &str) -> Option<f64> {
        self.get(curve).and_then(CellValue::as_number)
    }

    /// Whether the row carries the key at all (even if null).
    pub fn contains(&self, curve: &str) -> bool {
        self.cells.contains_key(curve)
    }

    pub fn curves(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// Ordered sequence of depth samples. Owned by the caller; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogTable {
    pub rows: Vec<LogRow>,
}

impl LogTable {
    pub fn new(rows: Vec<LogRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRow> {
        self.rows.iter()
    }
}

impl FromIterator<LogRow> for LogTable {
    fn from_iter<I: IntoIterator<Item = LogRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
