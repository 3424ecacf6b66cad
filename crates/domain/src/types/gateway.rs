//! Outcomes returned by the e-invoicing gateway

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::VALIDATED_STATUS;

/// Outcome of one document submission.
///
/// Submissions never fail with an error value; every failure path is folded
/// into `success == false` with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
}

impl SubmissionResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Validation state of one submitted document, as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub doc_type: String,
    pub ref_no: String,
    pub doc_date: Option<NaiveDateTime>,
    /// Authority-issued document id (`EInvIRBMNo`).
    pub authority_id: String,
    pub validation_date: Option<DateTime<FixedOffset>>,
    pub validation_link: String,
    pub status: String,
}

impl StatusRecord {
    /// True only for the exact `"Validated"` status string.
    pub fn is_validated(&self) -> bool {
        self.status == VALIDATED_STATUS
    }

    /// Validation timestamp as written to the ERP record; empty when absent.
    pub fn validation_date_text(&self) -> String {
        self.validation_date.map(|d| d.to_rfc3339()).unwrap_or_default()
    }
}
