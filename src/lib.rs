//! Facies Engine: well-log facies classification
//!
//! Groups depth samples into facies by vector quantisation over selected log
//! curves (GR, RHOB, NPHI, ...).
//!
//! ## Architecture
//!
//! - **Acquisition**: CSV log-table importer
//! - **Facies Engine**: data selection, normalisation, k-means / hierarchical /
//!   SOM clustering, supervised 1-NN, result assembly
//! - **Config**: TOML analysis parameters with validation and typo suggestions

pub mod acquisition;
pub mod config;
pub mod error;
pub mod facies_engine;
pub mod types;

// Re-export configuration
pub use config::{Algorithm, FaciesConfig, NormalizationMode, ScalerFit, SomMapping};

// Re-export errors
pub use error::{FaciesError, Result};

// Re-export commonly used types
pub use types::{
    CellValue, DepthRange, FaciesSummary, LogRow, LogTable, OptimalKResult, SupervisedResult,
    UnsupervisedResult,
};

// Re-export entry points
pub use facies_engine::{
    run_facies_analysis, run_optimal_k_analysis, run_supervised_facies_analysis, ConfusionMatrix,
};
