//! Insertion-ordered label ↔ id dictionary for supervised mode.
//!
//! Reference labels may be numbers or text. Ids are handed out in the order
//! labels are first seen, so the same reference table always yields the same
//! mapping.

use serde::{Deserialize, Serialize};

use crate::types::CellValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: Vec<CellValue>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `label`, assigning the next free id on first sight.
    pub fn intern(&mut self, label: &CellValue) -> usize {
        if let Some(id) = self.id_of(label) {
            return id;
        }
        self.labels.push(label.clone());
        self.labels.len() - 1
    }

    pub fn id_of(&self, label: &CellValue) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn label(&self, id: usize) -> Option<&CellValue> {
        self.labels.get(id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[CellValue] {
        &self.labels
    }
}
