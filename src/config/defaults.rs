//! System-wide default constants.
//!
//! Centralises the magic numbers of the facies engine.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Output columns
// ============================================================================

/// Column added to each selected row by unsupervised runs (integer facies id).
pub const FACIES_COLUMN: &str = "FACIES";

/// Column added to each selected row by supervised runs (original label value).
pub const FACIES_PRED_COLUMN: &str = "FACIES_PRED";

// ============================================================================
// Analysis
// ============================================================================

/// Default number of facies.
pub const DEFAULT_K: usize = 4;

/// Default iteration budget for k-means.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default RNG seed for k-means reseeding and SOM training.
pub const DEFAULT_SEED: u64 = 42;

/// Elbow sweep lower bound (inclusive).
pub const OPTIMAL_K_MIN: usize = 2;

/// Elbow sweep upper bound (inclusive).
pub const OPTIMAL_K_MAX: usize = 10;

// ============================================================================
// Self-organizing map
// ============================================================================

/// Default SOM training iterations (one random sample per iteration).
pub const SOM_ITERATIONS: usize = 100;

/// Learning rate at iteration 0; decays linearly towards zero.
pub const SOM_INITIAL_LEARNING_RATE: f64 = 0.5;

/// Floor for the decaying neighbourhood radius so the Gaussian kernel stays finite.
pub const SOM_MIN_RADIUS: f64 = 1e-3;

// ============================================================================
// Supervised mode
// ============================================================================

/// Maximum |Δdepth| for a prediction row to be matched with a labelled sample.
pub const DEPTH_MATCH_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Limits
// ============================================================================

/// Largest accepted facies count; bounds SOM grid and k-means centroid allocation.
pub const MAX_K: usize = 1_024;

/// Hard cap on selected rows for any algorithm.
pub const MAX_ROWS: usize = 200_000;

/// Average-linkage clustering is O(n²) memory and O(n³) time; cap its input.
pub const MAX_HIERARCHICAL_ROWS: usize = 2_000;

// ============================================================================
// Importer
// ============================================================================

/// LAS 2.0 conventional null sentinel.
pub const LAS_NULL_VALUE: f64 = -999.25;
