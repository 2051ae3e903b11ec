//! Supervised 1-NN facies classifier.
//!
//! Every query takes the label of its single nearest training vector by
//! Euclidean distance, ties to the first training row. No voting, no
//! distance weighting.

use rayon::prelude::*;

use super::{nearest, FeatureVector};

/// Predict a label id for each query vector.
///
/// `training_labels[i]` is the label id of `training[i]`. Returns an empty
/// vector when there is nothing to learn from.
pub fn predict(
    training: &[FeatureVector],
    training_labels: &[usize],
    queries: &[FeatureVector],
) -> Vec<usize> {
    if training.is_empty() || training.len() != training_labels.len() {
        return Vec::new();
    }
    queries
        .par_iter()
        .map(|q| training_labels[nearest(q, training).0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_label_wins() {
        let training = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.1, 0.0]];
        let labels = vec![0, 1, 0];
        let queries = vec![vec![0.9, 0.8], vec![0.05, 0.01], vec![0.6, 0.6]];
        assert_eq!(predict(&training, &labels, &queries), vec![1, 0, 1]);
    }

    #[test]
    fn test_self_prediction() {
        let training: Vec<FeatureVector> = (0..10).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let labels: Vec<usize> = (0..10).map(|i| i % 3).collect();
        assert_eq!(predict(&training, &labels, &training), labels);
    }

    #[test]
    fn test_tie_goes_to_first_training_row() {
        let training = vec![vec![0.0], vec![2.0]];
        assert_eq!(predict(&training, &[5, 7], &[vec![1.0]]), vec![5]);
    }

    #[test]
    fn test_empty_training() {
        assert!(predict(&[], &[], &[vec![1.0]]).is_empty());
    }
}
