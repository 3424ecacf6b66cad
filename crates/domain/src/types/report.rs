//! Per-pass counters logged at the end of every cycle

use serde::{Deserialize, Serialize};

use super::category::DocumentCategory;

/// Result of one category pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: DocumentCategory,
    pub rows_extracted: usize,
    pub documents: usize,
    pub captured: usize,
    pub errored: usize,
    pub write_back_failures: usize,
    /// Set when extraction failed and the pass was abandoned.
    pub extraction_error: Option<String>,
}

impl CategoryReport {
    pub fn empty(category: DocumentCategory) -> Self {
        Self {
            category,
            rows_extracted: 0,
            documents: 0,
            captured: 0,
            errored: 0,
            write_back_failures: 0,
            extraction_error: None,
        }
    }
}

/// Result of one reconciliation pass across all tracked document types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub references_checked: usize,
    pub validated: usize,
    pub finalized: usize,
    pub authority_updates: usize,
    /// Validated records with no matching local reference.
    pub skipped: usize,
    pub write_back_failures: usize,
    /// Document types whose lookup or status query failed.
    pub failed_doc_types: usize,
}

/// Result of one polling cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub categories: Vec<CategoryReport>,
    pub reconciliation: Option<ReconciliationReport>,
    /// The cycle stopped early at a category boundary.
    pub cancelled: bool,
}

impl CycleReport {
    pub fn documents_submitted(&self) -> usize {
        self.categories.iter().map(|c| c.documents).sum()
    }

    pub fn documents_captured(&self) -> usize {
        self.categories.iter().map(|c| c.captured).sum()
    }

    pub fn documents_errored(&self) -> usize {
        self.categories.iter().map(|c| c.errored).sum()
    }
}
