//! Facies analysis entry points
//!
//! Each entry point runs the full pipeline for one request:
//! 1. Validates parameters before touching the table
//! 2. Selects rows inside the depth window with complete feature readings
//! 3. Enforces the row caps from `[limits]`
//! 4. Normalises, runs the backend with a generator seeded from `analysis.seed`
//! 5. Assembles augmented rows and the per-facies summary
//!
//! Nothing is retained between calls.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::defaults::{DEPTH_MATCH_TOLERANCE, FACIES_COLUMN, FACIES_PRED_COLUMN, MAX_K};
use crate::config::{Algorithm, FaciesConfig, ScalerFit};
use crate::error::{FaciesError, Result};
use crate::types::{DepthRange, LogTable, OptimalKResult, SupervisedResult, UnsupervisedResult};

use super::{
    assemble, elbow_curve, hierarchical, kmeans, nearest_neighbor, normalize, som,
    ConfusionMatrix, DataSelector, Scaler, Selection, TrainingSet,
};

/// Cluster the selected rows into `config.analysis.k` facies with the
/// configured backend.
pub fn run_facies_analysis(
    table: &LogTable,
    feature_curves: &[String],
    depth_curve: &str,
    depth_range: DepthRange,
    config: &FaciesConfig,
) -> Result<UnsupervisedResult> {
    check_common_params(feature_curves, config)?;
    let analysis = &config.analysis;

    let selection = select(table, feature_curves, depth_curve, depth_range, config)?;
    if analysis.algorithm == Algorithm::Hierarchical {
        check_row_limit(
            Algorithm::Hierarchical.as_str(),
            selection.len(),
            config.limits.max_hierarchical_rows,
        )?;
    }

    let normalized = normalize(&selection.vectors, analysis.normalization);
    let mut rng = StdRng::seed_from_u64(analysis.seed);

    let mut sse = None;
    let mut iterations = None;
    let mut merges = None;
    let assignments = match analysis.algorithm {
        Algorithm::Kmeans => {
            let outcome = kmeans(&normalized, analysis.k, analysis.max_iterations, &mut rng);
            sse = Some(outcome.sse);
            iterations = Some(outcome.iterations);
            outcome.assignments
        }
        Algorithm::Hierarchical => {
            let outcome = hierarchical(&normalized, analysis.k);
            merges = Some(outcome.merges);
            outcome.assignments
        }
        Algorithm::Som => {
            som(&normalized, analysis.k, &config.som, analysis.max_iterations, &mut rng).assignments
        }
    };

    let assembled = assemble(
        &selection.filtered_rows,
        &selection.original_row_indices,
        &assignments,
        &selection.vectors,
        feature_curves,
        FACIES_COLUMN,
        None,
    );

    info!(
        algorithm = %analysis.algorithm,
        k = analysis.k,
        normalization = %analysis.normalization,
        rows = assignments.len(),
        facies = assembled.summary.len(),
        sse = ?sse,
        "Facies analysis complete"
    );

    Ok(UnsupervisedResult {
        algorithm: analysis.algorithm,
        k: analysis.k,
        normalization: analysis.normalization,
        rows: assembled.rows,
        assignments,
        original_row_indices: selection.original_row_indices,
        facies_summary: assembled.summary,
        sse,
        iterations,
        merges,
    })
}

/// Sweep k over `[optimal_k.min_k, optimal_k.max_k]` and report SSE for each.
///
/// No k is chosen; the caller reads the elbow off the curve.
pub fn run_optimal_k_analysis(
    table: &LogTable,
    feature_curves: &[String],
    depth_curve: &str,
    depth_range: DepthRange,
    config: &FaciesConfig,
) -> Result<OptimalKResult> {
    check_common_params(feature_curves, config)?;
    let bounds = &config.optimal_k;
    if bounds.min_k == 0 || bounds.max_k < bounds.min_k || bounds.max_k > MAX_K {
        return Err(FaciesError::InvalidParameter(format!(
            "optimal-k bounds must satisfy 1 <= min_k <= max_k <= {MAX_K} (got {}..={})",
            bounds.min_k, bounds.max_k
        )));
    }

    let selection = select(table, feature_curves, depth_curve, depth_range, config)?;
    let normalized = normalize(&selection.vectors, config.analysis.normalization);
    let curve = elbow_curve(
        &normalized,
        bounds.min_k..=bounds.max_k,
        config.analysis.max_iterations,
        config.analysis.seed,
    );

    info!(
        min_k = bounds.min_k,
        max_k = bounds.max_k,
        rows = selection.len(),
        "Optimal-k sweep complete"
    );

    Ok(OptimalKResult {
        k_values: curve.k_values,
        sse_values: curve.sse_values,
        normalization: config.analysis.normalization,
        rows_used: selection.len(),
    })
}

/// Label the selected rows with the 1-NN classifier trained on a reference
/// table, and score every prediction row whose depth matches a reference
/// sample.
///
/// The score compares the prediction table against its own reference depths;
/// it is a consistency check, not a holdout estimate.
#[allow(clippy::too_many_arguments)]
pub fn run_supervised_facies_analysis(
    table: &LogTable,
    feature_curves: &[String],
    depth_curve: &str,
    depth_range: DepthRange,
    training_table: &LogTable,
    training_depth_col: &str,
    training_label_col: &str,
    config: &FaciesConfig,
) -> Result<SupervisedResult> {
    check_common_params(feature_curves, config)?;
    let mode = config.analysis.normalization;
    let scaler_fit = config.supervised.scaler_fit;

    let training = TrainingSet::from_table(
        training_table,
        feature_curves,
        training_depth_col,
        training_label_col,
    )?;
    check_row_limit("supervised", training.len(), config.limits.max_rows)?;

    let selection = select(table, feature_curves, depth_curve, depth_range, config)?;

    let training_vectors = training.vectors();
    let (training_norm, query_norm) = match scaler_fit {
        ScalerFit::PerBatch => (
            normalize(&training_vectors, mode),
            normalize(&selection.vectors, mode),
        ),
        ScalerFit::Shared => {
            let scaler = Scaler::fit(&training_vectors, mode);
            (
                scaler.transform(&training_vectors),
                scaler.transform(&selection.vectors),
            )
        }
    };

    let predictions = nearest_neighbor::predict(&training_norm, &training.label_ids(), &query_norm);

    let lookup = training.depth_lookup();
    let mut confusion = ConfusionMatrix::new(training.labels.len());
    for (&row_idx, &predicted) in selection.original_row_indices.iter().zip(&predictions) {
        let truth = selection.filtered_rows[row_idx]
            .number(depth_curve)
            .and_then(|depth| lookup.label_at(depth, DEPTH_MATCH_TOLERANCE));
        if let Some(truth) = truth {
            confusion.record(truth, predicted);
        }
    }

    let assembled = assemble(
        &selection.filtered_rows,
        &selection.original_row_indices,
        &predictions,
        &selection.vectors,
        feature_curves,
        FACIES_PRED_COLUMN,
        Some(&training.labels),
    );

    let accuracy = confusion.accuracy();
    let evaluated_rows = confusion.total();
    info!(
        training_samples = training.len(),
        labels = training.labels.len(),
        rows = predictions.len(),
        evaluated_rows,
        accuracy = %format!("{:.3}", accuracy),
        scaler_fit = ?scaler_fit,
        "Supervised facies analysis complete"
    );

    Ok(SupervisedResult {
        rows: assembled.rows,
        predictions,
        original_row_indices: selection.original_row_indices,
        labels: training.labels.labels().to_vec(),
        facies_summary: assembled.summary,
        confusion_matrix: confusion,
        accuracy,
        evaluated_rows,
        training_samples: training.len(),
        normalization: mode,
        scaler_fit,
    })
}

/// Reject parameter combinations that cannot produce a result.
fn check_common_params(feature_curves: &[String], config: &FaciesConfig) -> Result<()> {
    if feature_curves.is_empty() {
        return Err(FaciesError::InvalidParameter(
            "at least one feature curve is required".to_string(),
        ));
    }
    if config.analysis.k == 0 {
        return Err(FaciesError::InvalidParameter("k must be > 0".to_string()));
    }
    if config.analysis.k > MAX_K {
        return Err(FaciesError::InvalidParameter(format!(
            "k = {} exceeds the maximum of {MAX_K} facies",
            config.analysis.k
        )));
    }
    if config.analysis.max_iterations == 0 {
        return Err(FaciesError::InvalidParameter(
            "max_iterations must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn select(
    table: &LogTable,
    feature_curves: &[String],
    depth_curve: &str,
    depth_range: DepthRange,
    config: &FaciesConfig,
) -> Result<Selection> {
    let selection = DataSelector::select(
        table,
        feature_curves,
        depth_curve,
        depth_range.min,
        depth_range.max,
    )?;
    debug!(
        table_rows = table.len(),
        selected = selection.len(),
        min_depth = depth_range.min,
        max_depth = depth_range.max,
        "Rows selected"
    );
    check_row_limit("selection", selection.len(), config.limits.max_rows)?;
    Ok(selection)
}

fn check_row_limit(algorithm: &str, rows: usize, limit: usize) -> Result<()> {
    if rows > limit {
        return Err(FaciesError::InputTooLarge {
            algorithm: algorithm.to_string(),
            rows,
            limit,
        });
    }
    Ok(())
}
