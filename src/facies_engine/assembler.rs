//! Result assembly: write facies ids back onto the selected rows and
//! summarise each facies.

use std::collections::BTreeMap;

use crate::types::{CellValue, FaciesSummary, LogRow};

use super::{facies_color, FeatureVector, LabelMap};

/// Augmented rows plus one summary per facies present.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub rows: Vec<LogRow>,
    pub summary: Vec<FaciesSummary>,
}

/// Build the augmented row set and per-facies summary.
///
/// `column` receives `Number(id)` on each classified row, or the original
/// label value when `labels` is given. Rows that no index points at are
/// copied without the column. `feature_vectors` must hold the raw
/// readings: summary centroids are reported in curve units.
pub fn assemble(
    filtered_rows: &[LogRow],
    original_row_indices: &[usize],
    assignments: &[usize],
    feature_vectors: &[FeatureVector],
    feature_curves: &[String],
    column: &str,
    labels: Option<&LabelMap>,
) -> Assembled {
    let mut rows = filtered_rows.to_vec();
    for (&row_idx, &id) in original_row_indices.iter().zip(assignments) {
        let value = match labels.and_then(|l| l.label(id)) {
            Some(label) => label.clone(),
            None => CellValue::Number(id as f64),
        };
        if let Some(row) = rows.get_mut(row_idx) {
            row.set(column, Some(value));
        }
    }

    // id -> (count, per-curve sums)
    let mut groups: BTreeMap<usize, (usize, Vec<f64>)> = BTreeMap::new();
    for (&id, vector) in assignments.iter().zip(feature_vectors) {
        let (count, sums) = groups
            .entry(id)
            .or_insert_with(|| (0, vec![0.0; feature_curves.len()]));
        *count += 1;
        for (s, v) in sums.iter_mut().zip(vector) {
            *s += v;
        }
    }

    let total = assignments.len();
    let summary = groups
        .into_iter()
        .map(|(id, (count, sums))| FaciesSummary {
            id,
            label: labels.and_then(|l| l.label(id)).cloned(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
            centroid: feature_curves
                .iter()
                .cloned()
                .zip(sums.iter().map(|s| s / count as f64))
                .collect(),
            color: facies_color(id).to_string(),
        })
        .collect();

    Assembled { rows, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<LogRow> {
        (0..n)
            .map(|i| LogRow::new().with("DEPT", Some(i as f64)).with("GR", Some(10.0 * i as f64)))
            .collect()
    }

    #[test]
    fn test_ids_written_and_summarised() {
        let filtered = rows(4);
        let vectors: Vec<FeatureVector> = (0..4).map(|i| vec![10.0 * i as f64]).collect();
        let out = assemble(
            &filtered,
            &[0, 1, 2, 3],
            &[1, 1, 0, 0],
            &vectors,
            &["GR".to_string()],
            "FACIES",
            None,
        );

        assert_eq!(out.rows[0].get("FACIES"), Some(&CellValue::Number(1.0)));
        assert_eq!(out.rows[3].get("FACIES"), Some(&CellValue::Number(0.0)));
        assert_eq!(out.summary.len(), 2);
        assert_eq!(out.summary[0].id, 0);
        assert_eq!(out.summary[0].count, 2);
        assert_eq!(out.summary[0].centroid["GR"], 25.0);
        assert_eq!(out.summary[1].centroid["GR"], 5.0);
        assert_eq!(out.summary[1].percentage, 50.0);
        assert_eq!(out.summary[1].color, facies_color(1));
        assert!(out.summary[0].label.is_none());
        // input untouched
        assert!(!filtered[0].contains("FACIES"));
    }

    #[test]
    fn test_labels_written_in_supervised_mode() {
        let mut labels = LabelMap::new();
        labels.intern(&CellValue::from("Sand"));
        labels.intern(&CellValue::Number(7.0));

        let out = assemble(
            &rows(2),
            &[0, 1],
            &[1, 0],
            &[vec![0.0], vec![10.0]],
            &["GR".to_string()],
            "FACIES_PRED",
            Some(&labels),
        );
        assert_eq!(out.rows[0].get("FACIES_PRED"), Some(&CellValue::Number(7.0)));
        assert_eq!(out.rows[1].get("FACIES_PRED"), Some(&CellValue::from("Sand")));
        assert_eq!(out.summary[0].label, Some(CellValue::from("Sand")));
    }

    #[test]
    fn test_unindexed_row_left_without_column() {
        let out = assemble(
            &rows(3),
            &[0, 2],
            &[0, 1],
            &[vec![0.0], vec![20.0]],
            &["GR".to_string()],
            "FACIES",
            None,
        );
        assert_eq!(out.rows.len(), 3);
        assert!(!out.rows[1].contains("FACIES"));
        assert_eq!(out.rows[2].get("FACIES"), Some(&CellValue::Number(1.0)));
        assert_eq!(out.summary[0].percentage, 50.0);
    }

    #[test]
    fn test_empty_assignments() {
        let out = assemble(&rows(2), &[], &[], &[], &["GR".to_string()], "FACIES", None);
        assert_eq!(out.rows.len(), 2);
        assert!(out.summary.is_empty());
    }
}
