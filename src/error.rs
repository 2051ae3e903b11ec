//! Engine error taxonomy.
//!
//! Only caller mistakes and empty selections are errors. Degenerate columns
//! and empty clusters are expected in real log data (dead zones, constant
//! readings) and are resolved with documented fallback values instead.

use thiserror::Error;

/// Errors raised by the facies analysis entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaciesError {
    /// No rows survived depth and missing-value filtering. Terminal for the run.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Rejected at entry, before any computation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input exceeds the configured row cap for the chosen algorithm.
    #[error("Input too large for {algorithm}: {rows} rows exceeds limit of {limit}")]
    InputTooLarge {
        algorithm: String,
        rows: usize,
        limit: usize,
    },
}

/// Convenience alias used across the engine.
pub type Result<T> = std::result::Result<T, FaciesError>;
