//! Facies Classification Engine
//!
//! Vector quantisation of well-log curves into facies. Every entry point is a
//! blocking, self-contained computation: nothing is cached between calls and
//! the caller's table is never mutated.
//!
//! ## Pipeline
//! 1. `data_selector`: depth window + missing-value filter, vectorisation
//! 2. `normalizer`: min-max / z-score / none, per batch
//! 3. Backend: `kmeans`, `hierarchical`, `som`, or supervised `nearest_neighbor`
//! 4. `assembler`: augmented rows + per-facies summary; `confusion` for supervised runs
//!
//! `analyzer` wires the stages together behind the public entry points.

pub mod data_selector;
pub mod normalizer;
pub mod kmeans;
pub mod hierarchical;
pub mod som;
pub mod label_map;
pub mod training_set;
pub mod nearest_neighbor;
pub mod confusion;
pub mod palette;
pub mod assembler;
pub mod analyzer;

// Re-export public types
pub use analyzer::{run_facies_analysis, run_optimal_k_analysis, run_supervised_facies_analysis};
pub use assembler::{assemble, Assembled};
pub use confusion::ConfusionMatrix;
pub use data_selector::{DataSelector, Selection};
pub use hierarchical::{hierarchical, HierarchicalOutcome};
pub use kmeans::{elbow_curve, kmeans, sse, ElbowCurve, KMeansOutcome};
pub use label_map::LabelMap;
pub use normalizer::{normalize, Scaler};
pub use palette::{facies_color, FACIES_COLORS};
pub use som::{som, SelfOrganizingMap, SomOutcome};
pub use training_set::{DepthLookup, TrainingSample, TrainingSet};

/// One row's readings for the selected feature curves, in curve order.
pub type FeatureVector = Vec<f64>;

/// Squared Euclidean distance.
pub(crate) fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of and squared distance to the closest candidate.
///
/// Ties resolve to the lowest index. Returns `(0, f64::INFINITY)` for an
/// empty candidate list.
pub(crate) fn nearest(point: &[f64], candidates: &[FeatureVector]) -> (usize, f64) {
    let mut best_idx = 0usize;
    let mut best_dist = f64::INFINITY;
    for (i, candidate) in candidates.iter().enumerate() {
        let dist = sq_dist(point, candidate);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    (best_idx, best_dist)
}
