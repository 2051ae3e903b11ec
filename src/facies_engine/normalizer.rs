//! Feature Normalizer
//!
//! Per-column rescaling of feature vectors before distance-based clustering.
//! Statistics come from the batch being scaled; a fitted [`Scaler`] can be
//! reused on a second batch when shared statistics are wanted.

use statrs::statistics::Statistics;

use crate::config::NormalizationMode;

use super::FeatureVector;

/// Column statistics captured from one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    mode: NormalizationMode,
    /// Per column: (min, max) for min-max, (mean, population std) for z-score.
    params: Vec<(f64, f64)>,
}

impl Scaler {
    /// Capture per-column statistics from `vectors`.
    pub fn fit(vectors: &[FeatureVector], mode: NormalizationMode) -> Self {
        let dims = vectors.first().map_or(0, Vec::len);
        let params = match mode {
            NormalizationMode::None => Vec::new(),
            NormalizationMode::MinMax => (0..dims)
                .map(|c| {
                    let column = column(vectors, c);
                    let min = column.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    (min, max)
                })
                .collect(),
            NormalizationMode::ZScore => (0..dims)
                .map(|c| {
                    let column = column(vectors, c);
                    (column.iter().mean(), column.iter().population_std_dev())
                })
                .collect(),
        };
        Self { mode, params }
    }

    /// Rescale `vectors` with the fitted statistics.
    ///
    /// Constant columns (zero range or zero std) map to 0.
    pub fn transform(&self, vectors: &[FeatureVector]) -> Vec<FeatureVector> {
        if self.mode == NormalizationMode::None {
            return vectors.to_vec();
        }
        vectors
            .iter()
            .map(|v| {
                v.iter()
                    .zip(&self.params)
                    .map(|(&x, &(a, b))| self.scale(x, a, b))
                    .collect()
            })
            .collect()
    }

    fn scale(&self, x: f64, a: f64, b: f64) -> f64 {
        match self.mode {
            NormalizationMode::MinMax => {
                let range = b - a;
                if range == 0.0 || !range.is_finite() {
                    0.0
                } else {
                    (x - a) / range
                }
            }
            NormalizationMode::ZScore => {
                if b == 0.0 || !b.is_finite() {
                    0.0
                } else {
                    (x - a) / b
                }
            }
            NormalizationMode::None => x,
        }
    }
}

/// Normalise a batch against its own statistics.
pub fn normalize(vectors: &[FeatureVector], mode: NormalizationMode) -> Vec<FeatureVector> {
    Scaler::fit(vectors, mode).transform(vectors)
}

fn column(vectors: &[FeatureVector], c: usize) -> Vec<f64> {
    vectors.iter().map(|v| v[c]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_range() {
        let v = vec![vec![10.0, 1.0], vec![20.0, 3.0], vec![30.0, 5.0]];
        let n = normalize(&v, NormalizationMode::MinMax);
        assert_eq!(n[0], vec![0.0, 0.0]);
        assert_eq!(n[1], vec![0.5, 0.5]);
        assert_eq!(n[2], vec![1.0, 1.0]);
    }

    #[test]
    fn test_z_score_uses_population_std() {
        // mean 5, population std 2
        let v: Vec<FeatureVector> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|&x| vec![x])
            .collect();
        let n = normalize(&v, NormalizationMode::ZScore);
        assert!((n[0][0] + 1.5).abs() < 1e-12);
        assert!((n[7][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_zero() {
        let v = vec![vec![2.65, 1.0], vec![2.65, 2.0], vec![2.65, 3.0]];
        for mode in [NormalizationMode::MinMax, NormalizationMode::ZScore] {
            let n = normalize(&v, mode);
            assert!(n.iter().all(|row| row[0] == 0.0), "{mode} constant column");
            assert!(n.iter().flatten().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_none_is_identity() {
        let v = vec![vec![1.0, -4.0], vec![7.5, 0.0]];
        assert_eq!(normalize(&v, NormalizationMode::None), v);
    }

    #[test]
    fn test_shared_scaler_applies_training_stats() {
        let train = vec![vec![0.0], vec![10.0]];
        let predict = vec![vec![5.0], vec![20.0]];
        let scaler = Scaler::fit(&train, NormalizationMode::MinMax);
        let n = scaler.transform(&predict);
        assert_eq!(n, vec![vec![0.5], vec![2.0]]);
        // Independent batch scaling maps the same points to [0, 1]
        assert_eq!(
            normalize(&predict, NormalizationMode::MinMax),
            vec![vec![0.0], vec![1.0]]
        );
    }

    #[test]
    fn test_empty_batch() {
        let n = normalize(&[], NormalizationMode::ZScore);
        assert!(n.is_empty());
    }
}
