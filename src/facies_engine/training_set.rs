//! Labelled reference samples for the supervised classifier.

use crate::error::{FaciesError, Result};
use crate::types::LogTable;

use super::{FeatureVector, LabelMap};

/// One labelled depth sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub depth: f64,
    pub label_id: usize,
    pub vector: FeatureVector,
}

/// Reference samples plus the label vocabulary they were encoded with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub samples: Vec<TrainingSample>,
    pub labels: LabelMap,
}

impl TrainingSet {
    /// Build from a labelled table.
    ///
    /// A row is used when it has a finite depth, a non-null label and a finite
    /// value in every feature curve. Labels get ids in first-seen row order.
    pub fn from_table(
        table: &LogTable,
        feature_curves: &[String],
        depth_col: &str,
        label_col: &str,
    ) -> Result<Self> {
        let mut set = Self::default();

        for row in table.iter() {
            let (Some(depth), Some(label)) = (row.number(depth_col), row.get(label_col)) else {
                continue;
            };
            let vector: Option<FeatureVector> =
                feature_curves.iter().map(|c| row.number(c)).collect();
            let Some(vector) = vector else {
                continue;
            };
            let label_id = set.labels.intern(label);
            set.samples.push(TrainingSample {
                depth,
                label_id,
                vector,
            });
        }

        if set.samples.is_empty() {
            return Err(FaciesError::InsufficientData(format!(
                "reference table has no rows with {depth_col}, {label_col} and complete {} readings",
                feature_curves.join("/")
            )));
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn vectors(&self) -> Vec<FeatureVector> {
        self.samples.iter().map(|s| s.vector.clone()).collect()
    }

    pub fn label_ids(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label_id).collect()
    }

    /// Depth-sorted index for matching prediction rows to reference labels.
    pub fn depth_lookup(&self) -> DepthLookup {
        let mut entries: Vec<(f64, usize)> =
            self.samples.iter().map(|s| (s.depth, s.label_id)).collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        DepthLookup { entries }
    }
}

/// Reference labels sorted by depth (stable, so duplicate depths keep table order).
#[derive(Debug, Clone)]
pub struct DepthLookup {
    entries: Vec<(f64, usize)>,
}

impl DepthLookup {
    /// Label id of the shallowest sample within `tolerance` of `depth`.
    pub fn label_at(&self, depth: f64, tolerance: f64) -> Option<usize> {
        let start = self.entries.partition_point(|(d, _)| *d < depth - tolerance);
        self.entries
            .get(start)
            .filter(|(d, _)| *d <= depth + tolerance)
            .map(|(_, id)| *id)
    }
}
