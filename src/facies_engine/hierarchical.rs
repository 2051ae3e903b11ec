//! Agglomerative hierarchical clustering, average linkage.
//!
//! Starts from singletons and repeatedly merges the closest pair of clusters
//! until `k` remain. The cluster-to-cluster distance is the mean Euclidean
//! distance over all member pairs, maintained incrementally with the
//! Lance-Williams update, which is exact for average linkage:
//!
//! ```text
//! d(a∪b, c) = (|a|·d(a, c) + |b|·d(b, c)) / (|a| + |b|)
//! ```
//!
//! Memory is O(n²) and time O(n³); callers cap the input size.

use super::{sq_dist, FeatureVector};

/// Result of an agglomerative run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalOutcome {
    pub assignments: Vec<usize>,
    /// Number of merges performed; `n - k` whenever `n > k`.
    pub merges: usize,
}

/// Cluster `vectors` into `k` groups by average linkage.
///
/// With `n <= k` no merging happens and each vector keeps its row index as id.
/// Surviving clusters are numbered in order of their lowest original slot,
/// which carries no geological meaning.
pub fn hierarchical(vectors: &[FeatureVector], k: usize) -> HierarchicalOutcome {
    let k = k.max(1);
    let n = vectors.len();
    if n <= k {
        return HierarchicalOutcome {
            assignments: (0..n).collect(),
            merges: 0,
        };
    }

    let mut dist = DistanceMatrix::new(vectors);
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active: Vec<bool> = vec![true; n];
    let mut remaining = n;
    let mut merges = 0;

    while remaining > k {
        let Some((a, b)) = closest_pair(&dist, &active) else {
            break;
        };

        let size_a = members[a].len() as f64;
        let size_b = members[b].len() as f64;
        for c in (0..n).filter(|&c| active[c] && c != a && c != b) {
            let merged = (size_a * dist.get(a, c) + size_b * dist.get(b, c)) / (size_a + size_b);
            dist.set(a, c, merged);
        }

        let absorbed = std::mem::take(&mut members[b]);
        members[a].extend(absorbed);
        active[b] = false;
        remaining -= 1;
        merges += 1;
    }

    let mut assignments = vec![0; n];
    for (id, cluster) in members
        .iter()
        .enumerate()
        .filter(|(slot, _)| active[*slot])
        .map(|(_, m)| m)
        .enumerate()
    {
        for &row in cluster {
            assignments[row] = id;
        }
    }

    tracing::debug!(rows = n, k, merges, "Average-linkage clustering complete");
    HierarchicalOutcome { assignments, merges }
}

/// First pair (row-major over `a < b`) with the smallest linkage distance.
fn closest_pair(dist: &DistanceMatrix, active: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for a in (0..active.len()).filter(|&a| active[a]) {
        for b in (a + 1..active.len()).filter(|&b| active[b]) {
            let d = dist.get(a, b);
            if best.map_or(true, |(_, _, best_d)| d < best_d) {
                best = Some((a, b, d));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

/// Symmetric dense distance matrix stored row-major.
struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    fn new(vectors: &[FeatureVector]) -> Self {
        let n = vectors.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in i + 1..n {
                let d = sq_dist(&vectors[i], &vectors[j]).sqrt();
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }
        Self { n, cells }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, d: f64) {
        self.cells[i * self.n + j] = d;
        self.cells[j * self.n + i] = d;
    }
}
