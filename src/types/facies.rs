//! Facies analysis result types: per-facies summaries and the records
//! returned by the three analysis entry points.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CellValue, LogRow};
use crate::config::{Algorithm, NormalizationMode, ScalerFit};
use crate::facies_engine::ConfusionMatrix;

/// Inclusive depth window, in the units of the depth curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f64,
    pub max: f64,
}

impl DepthRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Window covering every finite depth.
    pub fn unbounded() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min && depth <= self.max
    }
}

/// Statistics for one facies id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaciesSummary {
    pub id: usize,
    /// Original label value (supervised runs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<CellValue>,
    pub count: usize,
    /// Share of classified rows, 0-100
    pub percentage: f64,
    /// Mean raw (un-normalised) reading per feature curve
    pub centroid: BTreeMap<String, f64>,
    /// Palette colour, hex
    pub color: String,
}

/// Output of an unsupervised classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupervisedResult {
    pub algorithm: Algorithm,
    pub k: usize,
    pub normalization: NormalizationMode,
    /// Selected rows with a `FACIES` column added
    pub rows: Vec<LogRow>,
    pub assignments: Vec<usize>,
    /// Position of each assignment inside `rows`
    pub original_row_indices: Vec<usize>,
    pub facies_summary: Vec<FaciesSummary>,
    /// Within-cluster sum of squares (k-means only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sse: Option<f64>,
    /// Lloyd passes run (k-means only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// Merges performed (hierarchical only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merges: Option<usize>,
}

/// SSE-versus-k sweep for choosing k by eye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalKResult {
    pub k_values: Vec<usize>,
    pub sse_values: Vec<f64>,
    pub normalization: NormalizationMode,
    pub rows_used: usize,
}

/// Output of a supervised (1-NN) classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisedResult {
    /// Selected rows with a `FACIES_PRED` column holding the predicted label
    pub rows: Vec<LogRow>,
    /// Predicted label id per selected row
    pub predictions: Vec<usize>,
    pub original_row_indices: Vec<usize>,
    /// Label vocabulary in id order
    pub labels: Vec<CellValue>,
    pub facies_summary: Vec<FaciesSummary>,
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    /// Prediction rows whose depth matched a reference sample
    pub evaluated_rows: usize,
    pub training_samples: usize,
    pub normalization: NormalizationMode,
    pub scaler_fit: ScalerFit,
}
