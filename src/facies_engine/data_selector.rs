//! Data Selector
//!
//! Filters a log table to a depth interval, then vectorises the rows of that
//! interval that have a reading in every selected feature curve. Rows with a
//! missing reading stay in the interval but get no vector.

use crate::error::{FaciesError, Result};
use crate::types::{DepthRange, LogRow, LogTable};

use super::FeatureVector;

/// Output of the selector.
///
/// `filtered_rows` is every row inside the depth window, complete or not.
/// `original_row_indices[i]` is the position of `vectors[i]` inside
/// `filtered_rows`, not inside the caller's unfiltered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub vectors: Vec<FeatureVector>,
    pub original_row_indices: Vec<usize>,
    pub filtered_rows: Vec<LogRow>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Depth window and null filter.
pub struct DataSelector;

impl DataSelector {
    /// Keep rows with `min_depth <= depth <= max_depth`, and vectorise those
    /// with a finite value in every feature curve.
    ///
    /// Column existence is not checked: an absent curve reads as missing, so a
    /// misspelt curve name ends in `InsufficientData`.
    pub fn select(
        table: &LogTable,
        feature_curves: &[String],
        depth_curve: &str,
        min_depth: f64,
        max_depth: f64,
    ) -> Result<Selection> {
        let mut vectors = Vec::new();
        let mut original_row_indices = Vec::new();
        let mut filtered_rows = Vec::new();

        let window = DepthRange::new(min_depth, max_depth);
        let in_range = table
            .iter()
            .filter(|row| row.number(depth_curve).is_some_and(|d| window.contains(d)));

        for row in in_range {
            let vector: Option<FeatureVector> =
                feature_curves.iter().map(|c| row.number(c)).collect();
            if let Some(vector) = vector {
                original_row_indices.push(filtered_rows.len());
                vectors.push(vector);
            }
            filtered_rows.push(row.clone());
        }

        if vectors.is_empty() {
            return Err(FaciesError::InsufficientData(format!(
                "no rows with complete {} readings between {} and {} {}",
                feature_curves.join("/"),
                min_depth,
                max_depth,
                depth_curve
            )));
        }

        tracing::debug!(
            table_rows = table.len(),
            in_window = filtered_rows.len(),
            selected = vectors.len(),
            min_depth,
            max_depth,
            "Depth/null selection complete"
        );

        Ok(Selection {
            vectors,
            original_row_indices,
            filtered_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curves(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn table() -> LogTable {
        (0..10)
            .map(|i| {
                let gr = if i == 4 { None } else { Some(50.0 + i as f64) };
                LogRow::new()
                    .with("DEPT", Some(1000.0 + i as f64))
                    .with("GR", gr)
                    .with("RHOB", Some(2.3))
            })
            .collect()
    }

    #[test]
    fn test_depth_window_is_inclusive() {
        let sel = DataSelector::select(&table(), &curves(&["GR"]), "DEPT", 1001.0, 1003.0)
            .expect("rows in range");
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.vectors[0], vec![51.0]);
        assert_eq!(sel.vectors[2], vec![53.0]);
    }

    #[test]
    fn test_null_feature_row_kept_without_vector() {
        let sel = DataSelector::select(&table(), &curves(&["GR", "RHOB"]), "DEPT", 1000.0, 1009.0)
            .expect("rows in range");
        assert_eq!(sel.len(), 9);
        assert_eq!(sel.filtered_rows.len(), 10);
        assert_eq!(sel.filtered_rows[4].number("DEPT"), Some(1004.0));
        assert_eq!(sel.original_row_indices, vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
        assert_eq!(sel.vectors[4], vec![55.0, 2.3]);
    }

    #[test]
    fn test_window_bounds_exclude_outside_rows() {
        let sel = DataSelector::select(&table(), &curves(&["GR"]), "DEPT", 1003.0, 1005.0)
            .expect("rows in range");
        // 1004 has no GR: kept in the window, skipped by the vectors
        assert_eq!(sel.filtered_rows.len(), 3);
        assert_eq!(sel.original_row_indices, vec![0, 2]);
    }

    #[test]
    fn test_inverted_range_is_insufficient() {
        let result = DataSelector::select(&table(), &curves(&["GR"]), "DEPT", 1005.0, 1002.0);
        assert!(matches!(result, Err(FaciesError::InsufficientData(_))));
    }

    #[test]
    fn test_absent_curve_reads_as_missing() {
        let result = DataSelector::select(&table(), &curves(&["NPHI"]), "DEPT", 1000.0, 1009.0);
        assert!(matches!(result, Err(FaciesError::InsufficientData(_))));
    }

    #[test]
    fn test_row_without_depth_is_skipped() {
        let mut t = table();
        t.rows.push(LogRow::new().with("GR", Some(99.0)));
        let sel = DataSelector::select(&t, &curves(&["GR"]), "DEPT", f64::MIN, f64::MAX)
            .expect("rows in range");
        assert_eq!(sel.len(), 9);
        assert_eq!(sel.filtered_rows.len(), 10);
    }
}
