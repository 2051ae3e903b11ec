//! Log data acquisition
//!
//! Loads well-log tables from delimited text exports.

pub mod csv_table;

pub use csv_table::{load_csv, parse_csv_str, CsvOptions, TableError};
