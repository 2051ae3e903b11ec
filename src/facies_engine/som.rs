//! Self-organizing map used as a facies clustering proxy.
//!
//! A square grid of `ceil(sqrt(k))²` nodes is trained with one random sample
//! per iteration. Learning rate and neighbourhood radius decay linearly from
//! their initial values towards zero. Each node inside the current radius of
//! the best-matching unit moves towards the sample by
//! `exp(-d² / (2·r²)) · lr · (x - w)`, where `d` is the grid distance to the
//! BMU. After training, each input is mapped through its BMU to a facies id.

use rand::Rng;

use crate::config::defaults::SOM_MIN_RADIUS;
use crate::config::{SomConfig, SomMapping};

use super::kmeans::kmeans;
use super::{nearest, FeatureVector};

/// Trained map plus the facies assignment derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SomOutcome {
    pub assignments: Vec<usize>,
    /// Best-matching grid node per input vector.
    pub bmu: Vec<usize>,
    /// Facies id of every grid node.
    pub node_facies: Vec<usize>,
    pub map: SelfOrganizingMap,
}

/// Square Kohonen grid; node `i` sits at `(i % side, i / side)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfOrganizingMap {
    side: usize,
    weights: Vec<FeatureVector>,
}

impl SelfOrganizingMap {
    /// Grid with every weight drawn uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(side: usize, dims: usize, rng: &mut R) -> Self {
        let weights = (0..side * side)
            .map(|_| (0..dims).map(|_| rng.gen::<f64>()).collect())
            .collect();
        Self { side, weights }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn weights(&self) -> &[FeatureVector] {
        &self.weights
    }

    /// Index of the node closest to `x`, ties to the lowest index.
    pub fn best_matching_unit(&self, x: &[f64]) -> usize {
        nearest(x, &self.weights).0
    }

    /// Online training over `iterations` randomly drawn samples.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        vectors: &[FeatureVector],
        iterations: usize,
        initial_learning_rate: f64,
        initial_radius: f64,
        rng: &mut R,
    ) {
        if vectors.is_empty() || iterations == 0 {
            return;
        }

        for t in 0..iterations {
            let decay = 1.0 - t as f64 / iterations as f64;
            let learning_rate = initial_learning_rate * decay;
            let radius = (initial_radius * decay).max(SOM_MIN_RADIUS);
            let radius_sq = radius * radius;

            let sample = &vectors[rng.gen_range(0..vectors.len())];
            let bmu = self.best_matching_unit(sample);

            for node in 0..self.weights.len() {
                let d_sq = self.grid_dist_sq(node, bmu);
                if d_sq > radius_sq {
                    continue;
                }
                let influence = (-d_sq / (2.0 * radius_sq)).exp();
                let step = influence * learning_rate;
                for (w, x) in self.weights[node].iter_mut().zip(sample) {
                    *w += step * (x - *w);
                }
            }
        }
    }

    /// Squared Euclidean distance between two nodes in grid coordinates.
    fn grid_dist_sq(&self, a: usize, b: usize) -> f64 {
        let dx = (a % self.side) as f64 - (b % self.side) as f64;
        let dy = (a / self.side) as f64 - (b / self.side) as f64;
        dx * dx + dy * dy
    }
}

/// Train a map sized for `k` facies and assign every vector.
///
/// `max_iterations` bounds the k-means pass used by [`SomMapping::NodeKmeans`].
pub fn som<R: Rng + ?Sized>(
    vectors: &[FeatureVector],
    k: usize,
    params: &SomConfig,
    max_iterations: usize,
    rng: &mut R,
) -> SomOutcome {
    let k = k.max(1);
    let side = (k as f64).sqrt().ceil() as usize;
    let dims = vectors.first().map_or(0, Vec::len);
    let initial_radius = params
        .initial_radius
        .unwrap_or_else(|| (side as f64 / 2.0).max(1.0));

    let mut map = SelfOrganizingMap::random(side, dims, rng);
    map.train(
        vectors,
        params.iterations,
        params.initial_learning_rate,
        initial_radius,
        rng,
    );

    let node_facies: Vec<usize> = match params.mapping {
        SomMapping::Modulo => (0..side * side).map(|node| node % k).collect(),
        SomMapping::NodeKmeans => kmeans(map.weights(), k, max_iterations, rng).assignments,
    };

    let bmu: Vec<usize> = vectors.iter().map(|v| map.best_matching_unit(v)).collect();
    let assignments = bmu.iter().map(|&node| node_facies[node]).collect();

    tracing::debug!(
        rows = vectors.len(),
        grid_side = side,
        iterations = params.iterations,
        mapping = ?params.mapping,
        "SOM training complete"
    );

    SomOutcome {
        assignments,
        bmu,
        node_facies,
        map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_blobs() -> Vec<FeatureVector> {
        (0..40)
            .map(|i| {
                let jitter = (i % 5) as f64 * 0.01;
                if i % 2 == 0 {
                    vec![0.05 + jitter, 0.05 + jitter]
                } else {
                    vec![0.95 - jitter, 0.95 - jitter]
                }
            })
            .collect()
    }

    #[test]
    fn test_grid_side() {
        let v = two_blobs();
        let mut rng = StdRng::seed_from_u64(1);
        for (k, side) in [(1, 1), (2, 2), (4, 2), (5, 3), (9, 3), (10, 4)] {
            let out = som(&v, k, &SomConfig::default(), 100, &mut rng);
            assert_eq!(out.map.side(), side, "k = {k}");
            assert_eq!(out.map.weights().len(), side * side);
        }
    }

    #[test]
    fn test_modulo_mapping() {
        let v = two_blobs();
        let out = som(&v, 3, &SomConfig::default(), 100, &mut StdRng::seed_from_u64(3));
        // 2x2 grid folded onto 3 facies: node 3 shares facies 0 with node 0
        assert_eq!(out.node_facies, vec![0, 1, 2, 0]);
        for (a, b) in out.assignments.iter().zip(&out.bmu) {
            assert_eq!(*a, b % 3);
        }
    }

    #[test]
    fn test_node_kmeans_mapping_in_range() {
        let v = two_blobs();
        let params = SomConfig {
            mapping: SomMapping::NodeKmeans,
            ..SomConfig::default()
        };
        let out = som(&v, 3, &params, 100, &mut StdRng::seed_from_u64(3));
        assert_eq!(out.node_facies.len(), 4);
        assert!(out.assignments.iter().all(|&c| c < 3));
    }

    #[test]
    fn test_training_reduces_quantization_error() {
        let v = two_blobs();
        let params = SomConfig {
            iterations: 500,
            ..SomConfig::default()
        };
        let quantization_error = |map: &SelfOrganizingMap| -> f64 {
            v.iter()
                .map(|x| nearest(x, map.weights()).1.sqrt())
                .sum::<f64>()
                / v.len() as f64
        };

        // som() draws the initial grid first, so the same seed reproduces it
        let untrained = SelfOrganizingMap::random(2, 2, &mut StdRng::seed_from_u64(9));
        let out = som(&v, 2, &params, 100, &mut StdRng::seed_from_u64(9));
        assert!(quantization_error(&out.map) < quantization_error(&untrained));
    }

    #[test]
    fn test_same_seed_same_map() {
        let v = two_blobs();
        let a = som(&v, 4, &SomConfig::default(), 100, &mut StdRng::seed_from_u64(5));
        let b = som(&v, 4, &SomConfig::default(), 100, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_bmu_update_moves_towards_sample() {
        let mut map = SelfOrganizingMap {
            side: 1,
            weights: vec![vec![0.0, 0.0]],
        };
        let sample = vec![vec![1.0, 1.0]];
        map.train(&sample, 1, 0.5, 1.0, &mut StdRng::seed_from_u64(0));
        // t = 0: full learning rate, influence 1 at the BMU
        assert!((map.weights()[0][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let out = som(&[], 4, &SomConfig::default(), 100, &mut StdRng::seed_from_u64(5));
        assert!(out.assignments.is_empty());
    }
}
