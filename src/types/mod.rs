//! Shared data structures for facies classification
//!
//! - `log_table`: CellValue, LogRow, LogTable (engine input)
//! - `facies`: DepthRange, FaciesSummary and the per-entry-point result records

mod log_table;
mod facies;

pub use log_table::*;
pub use facies::*;
