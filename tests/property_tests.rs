//! Property-based tests for the facies engine
//!
//! - Shape invariants of every clustering backend
//! - Normalisation bounds and degenerate-column safety
//! - Hierarchical merge count, k-means determinism, confusion-matrix accuracy
//! - Run with ProptestConfig::with_cases(64)

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use facies_engine::config::{NormalizationMode, SomConfig};
use facies_engine::facies_engine::{
    hierarchical, kmeans, normalize, som, ConfusionMatrix, FeatureVector,
};

// ============================================================================
// Strategies
// ============================================================================

/// `n` feature vectors of a shared dimension, n in `rows`.
fn arb_vectors(rows: std::ops::Range<usize>) -> impl Strategy<Value = Vec<FeatureVector>> {
    (1usize..4).prop_flat_map(move |dims| {
        proptest::collection::vec(
            proptest::collection::vec(-500.0f64..500.0, dims),
            rows.clone(),
        )
    })
}

fn arb_matrix() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..7).prop_flat_map(|k| {
        proptest::collection::vec(proptest::collection::vec(0usize..50, k), k)
    })
}

fn column(vectors: &[FeatureVector], c: usize) -> Vec<f64> {
    vectors.iter().map(|v| v[c]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ========================================================================
    // Shape invariant
    // ========================================================================

    /// Property: every backend labels every vector with an id below k
    #[test]
    fn prop_backends_shape_invariant(
        vectors in arb_vectors(1..40),
        k in 1usize..8,
        seed in any::<u64>(),
    ) {
        let n = vectors.len();
        let mut rng = StdRng::seed_from_u64(seed);

        let km = kmeans(&vectors, k, 100, &mut rng).assignments;
        let hc = hierarchical(&vectors, k).assignments;
        let sm = som(&vectors, k, &SomConfig::default(), 100, &mut rng).assignments;

        for assignments in [&km, &hc, &sm] {
            prop_assert_eq!(assignments.len(), n);
            prop_assert!(assignments.iter().all(|&a| a < k));
        }
    }

    // ========================================================================
    // Normalisation
    // ========================================================================

    /// Property: min-max output lies in [0, 1]
    #[test]
    fn prop_min_max_bounds(vectors in arb_vectors(1..60)) {
        let scaled = normalize(&vectors, NormalizationMode::MinMax);
        prop_assert_eq!(scaled.len(), vectors.len());
        for v in scaled.iter().flatten() {
            prop_assert!((0.0..=1.0).contains(v), "{} outside [0, 1]", v);
        }
    }

    /// Property: z-score columns with spread have mean 0 and population std 1
    #[test]
    fn prop_z_score_moments(vectors in arb_vectors(2..60)) {
        let scaled = normalize(&vectors, NormalizationMode::ZScore);
        let dims = vectors[0].len();
        for c in 0..dims {
            let raw = column(&vectors, c);
            let raw_mean = raw.iter().sum::<f64>() / raw.len() as f64;
            let raw_var = raw.iter().map(|x| (x - raw_mean).powi(2)).sum::<f64>() / raw.len() as f64;
            if raw_var.sqrt() < 1e-3 {
                continue;
            }

            let z = column(&scaled, c);
            let mean = z.iter().sum::<f64>() / z.len() as f64;
            let var = z.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / z.len() as f64;
            prop_assert!(mean.abs() < 1e-6, "mean {}", mean);
            prop_assert!((var.sqrt() - 1.0).abs() < 1e-6, "std {}", var.sqrt());
        }
    }

    /// Property: a constant column scales to exactly 0 in every mode that rescales
    #[test]
    fn prop_constant_column_is_zero(value in -1.0e6f64..1.0e6, rows in 1usize..40) {
        let vectors: Vec<FeatureVector> = (0..rows).map(|i| vec![value, i as f64]).collect();
        for mode in [NormalizationMode::MinMax, NormalizationMode::ZScore] {
            let scaled = normalize(&vectors, mode);
            for v in &scaled {
                prop_assert_eq!(v[0], 0.0);
                prop_assert!(v[1].is_finite());
            }
        }
    }

    // ========================================================================
    // Hierarchical merge count
    // ========================================================================

    /// Property: n points to k < n clusters takes n - k merges and yields k ids
    #[test]
    fn prop_hierarchical_merge_count(
        (vectors, k) in arb_vectors(2..30).prop_flat_map(|v| {
            let n = v.len();
            (Just(v), 1..n)
        })
    ) {
        let outcome = hierarchical(&vectors, k);
        prop_assert_eq!(outcome.merges, vectors.len() - k);

        let mut ids = outcome.assignments.clone();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids, (0..k).collect::<Vec<_>>());
    }

    // ========================================================================
    // K-means determinism
    // ========================================================================

    /// Property: same input and seed give identical assignments and SSE
    #[test]
    fn prop_kmeans_deterministic(
        vectors in arb_vectors(1..50),
        k in 1usize..6,
        seed in any::<u64>(),
    ) {
        let a = kmeans(&vectors, k, 100, &mut StdRng::seed_from_u64(seed));
        let b = kmeans(&vectors, k, 100, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a.assignments, b.assignments);
        prop_assert_eq!(a.sse.to_bits(), b.sse.to_bits());
    }

    /// Property: the empty-cluster reseed path is reproducible under a fixed seed
    #[test]
    fn prop_kmeans_reseed_reproducible(
        dup in 3usize..10,
        tail in proptest::collection::vec(-10.0f64..10.0, 1..10),
        seed in any::<u64>(),
    ) {
        // Leading duplicates make the first k centroids identical, so clusters 1.. start empty
        let mut vectors: Vec<FeatureVector> = vec![vec![0.0]; dup];
        vectors.extend(tail.into_iter().map(|x| vec![x]));

        let a = kmeans(&vectors, 3, 100, &mut StdRng::seed_from_u64(seed));
        let b = kmeans(&vectors, 3, 100, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(&a.assignments, &b.assignments);
        prop_assert_eq!(a.centroids, b.centroids);
        prop_assert!(a.assignments.iter().all(|&c| c < 3));
    }

    // ========================================================================
    // Confusion matrix
    // ========================================================================

    /// Property: accuracy equals trace / total exactly
    #[test]
    fn prop_accuracy_is_trace_over_total(cells in arb_matrix()) {
        let trace: usize = (0..cells.len()).map(|i| cells[i][i]).sum();
        let total: usize = cells.iter().flatten().sum();
        let matrix = ConfusionMatrix::from_cells(cells).expect("square by construction");

        let expected = if total == 0 { 0.0 } else { trace as f64 / total as f64 };
        prop_assert_eq!(matrix.accuracy(), expected);
        prop_assert_eq!(matrix.trace(), trace);
        prop_assert_eq!(matrix.total(), total);
    }
}
