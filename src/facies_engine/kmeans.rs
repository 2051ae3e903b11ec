//! Batch K-Means facies clustering.
//!
//! Lloyd iterations with centroids seeded from the first `k` input vectors.
//! Seeding is deterministic but depends on row order; the only randomness is
//! the reseed of a centroid whose cluster empties, drawn from the injected RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{nearest, sq_dist, FeatureVector};

/// Result of one k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOutcome {
    pub assignments: Vec<usize>,
    pub centroids: Vec<FeatureVector>,
    /// Sum of squared distances to the assigned centroid.
    pub sse: f64,
    /// Lloyd passes performed (0 for the small-input case).
    pub iterations: usize,
}

/// Elbow-curve data: SSE per candidate k, no automatic choice.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElbowCurve {
    pub k_values: Vec<usize>,
    pub sse_values: Vec<f64>,
}

/// Cluster `vectors` into `k` groups.
///
/// With fewer vectors than `k`, every vector becomes its own cluster and SSE is 0.
/// `k = 0` and `max_iterations = 0` are treated as 1; the analyzer rejects
/// both before getting here.
pub fn kmeans<R: Rng + ?Sized>(
    vectors: &[FeatureVector],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> KMeansOutcome {
    let k = k.max(1);
    let max_iterations = max_iterations.max(1);
    let n = vectors.len();
    if n < k {
        return KMeansOutcome {
            assignments: (0..n).collect(),
            centroids: vectors.to_vec(),
            sse: 0.0,
            iterations: 0,
        };
    }

    let dims = vectors.first().map_or(0, Vec::len);
    let mut centroids: Vec<FeatureVector> = vectors[..k].to_vec();
    let mut assignments: Vec<usize> = vec![usize::MAX; n];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;

        // Assignment step
        let mut changed = false;
        for (point, slot) in vectors.iter().zip(assignments.iter_mut()) {
            let best = nearest(point, &centroids).0;
            if *slot != best {
                *slot = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        // Update step
        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (point, &c) in vectors.iter().zip(&assignments) {
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(point) {
                *s += x;
            }
        }
        for c in 0..k {
            if counts[c] == 0 {
                let pick = rng.gen_range(0..n);
                tracing::trace!(cluster = c, reseed_row = pick, "Empty cluster reseeded");
                centroids[c] = vectors[pick].clone();
            } else {
                let count = counts[c] as f64;
                centroids[c] = sums[c].iter().map(|s| s / count).collect();
            }
        }
    }

    let sse = sse(vectors, &assignments, &centroids);
    KMeansOutcome {
        assignments,
        centroids,
        sse,
        iterations,
    }
}

/// Sum of squared Euclidean distances from each vector to its assigned centroid.
pub fn sse(vectors: &[FeatureVector], assignments: &[usize], centroids: &[FeatureVector]) -> f64 {
    vectors
        .iter()
        .zip(assignments)
        .filter_map(|(v, &c)| centroids.get(c).map(|centroid| sq_dist(v, centroid)))
        .sum()
}

/// Run k-means for every k in `k_range` and report the SSE of each.
///
/// Runs are independent and evaluated in parallel; run `k` draws from its own
/// generator seeded with `seed + k`, so the curve does not depend on thread
/// scheduling.
pub fn elbow_curve(
    vectors: &[FeatureVector],
    k_range: std::ops::RangeInclusive<usize>,
    max_iterations: usize,
    seed: u64,
) -> ElbowCurve {
    let k_values: Vec<usize> = k_range.collect();
    let sse_values = k_values
        .par_iter()
        .map(|&k| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(k as u64));
            kmeans(vectors, k, max_iterations, &mut rng).sse
        })
        .collect();
    ElbowCurve {
        k_values,
        sse_values,
    }
}
