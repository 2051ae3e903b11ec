//! Confusion matrix for supervised runs.

use serde::{Deserialize, Serialize};

use crate::error::{FaciesError, Result};

/// Square count matrix: rows are true label ids, columns predicted label ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    cells: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Empty `k × k` matrix.
    pub fn new(k: usize) -> Self {
        Self {
            cells: vec![vec![0; k]; k],
        }
    }

    /// Wrap existing counts; rejects non-square input.
    pub fn from_cells(cells: Vec<Vec<usize>>) -> Result<Self> {
        let k = cells.len();
        if let Some(bad) = cells.iter().position(|row| row.len() != k) {
            return Err(FaciesError::InvalidParameter(format!(
                "confusion matrix row {bad} has {} cells, expected {k}",
                cells[bad].len()
            )));
        }
        Ok(Self { cells })
    }

    /// Count one evaluated row. Ids outside the matrix are ignored.
    pub fn record(&mut self, truth: usize, predicted: usize) {
        if let Some(cell) = self.cells.get_mut(truth).and_then(|r| r.get_mut(predicted)) {
            *cell += 1;
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, truth: usize, predicted: usize) -> usize {
        self.cells
            .get(truth)
            .and_then(|r| r.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> usize {
        self.cells.iter().enumerate().map(|(i, row)| row[i]).sum()
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// `trace / total`, or 0 when nothing was evaluated.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.trace() as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_accuracy() {
        let mut m = ConfusionMatrix::new(2);
        m.record(0, 0);
        m.record(0, 1);
        m.record(1, 1);
        m.record(1, 1);
        assert_eq!(m.cell(0, 1), 1);
        assert_eq!(m.trace(), 3);
        assert_eq!(m.total(), 4);
        assert!((m.accuracy() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix_accuracy() {
        assert_eq!(ConfusionMatrix::new(3).accuracy(), 0.0);
        assert_eq!(ConfusionMatrix::new(0).accuracy(), 0.0);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut m = ConfusionMatrix::new(2);
        m.record(5, 0);
        assert_eq!(m.total(), 0);
    }

    #[test]
    fn test_from_cells_rejects_ragged() {
        assert!(ConfusionMatrix::from_cells(vec![vec![1, 2], vec![3]]).is_err());
        let m = ConfusionMatrix::from_cells(vec![vec![4, 1], vec![2, 3]]).expect("square");
        assert_eq!(m.trace(), 7);
    }
}
