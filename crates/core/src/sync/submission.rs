//! Per-category submission pass
//!
//! extract → group → map → submit → write back, one document at a time.
//! Failures stay inside the unit that produced them: an extraction failure
//! ends only its own category, a write-back failure only its own document.

use std::sync::Arc;

use einvoice_domain::constants::DEFAULT_STATUS_MESSAGE_LIMIT;
use einvoice_domain::{CategoryReport, DocumentCategory, StagedDocument, StagingStatus};
use tracing::{error, info, warn};

use super::grouping::group_rows;
use super::mapping::map_document;
use super::ports::{EInvoiceGateway, StagingStore};
use crate::time::Clock;
use crate::utils::text::truncate_chars;

/// Moves pending staging documents of one category to the gateway.
pub struct SubmissionService {
    store: Arc<dyn StagingStore>,
    gateway: Arc<dyn EInvoiceGateway>,
    clock: Arc<dyn Clock>,
    message_limit: usize,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn StagingStore>,
        gateway: Arc<dyn EInvoiceGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, gateway, clock, message_limit: DEFAULT_STATUS_MESSAGE_LIMIT }
    }

    /// Maximum number of characters of a failure message stored in staging.
    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Run one pass over a category. Never returns an error; problems are
    /// logged and counted in the report.
    pub async fn process_category(&self, category: DocumentCategory) -> CategoryReport {
        let mut report = CategoryReport::empty(category);

        let rows = match self.store.fetch_pending(category).await {
            Ok(rows) => rows,
            Err(err) => {
                error!(
                    category = %category,
                    table = category.staging_table(),
                    error = %err,
                    "Failed to extract staged documents; skipping category"
                );
                report.extraction_error = Some(err.to_string());
                return report;
            }
        };

        if rows.is_empty() {
            info!(category = %category, "No pending documents in staging");
            return report;
        }

        report.rows_extracted = rows.len();
        let documents = group_rows(category, rows);
        report.documents = documents.len();

        for document in &documents {
            self.submit_document(document, &mut report).await;
        }

        info!(
            category = %category,
            documents = report.documents,
            captured = report.captured,
            errored = report.errored,
            write_back_failures = report.write_back_failures,
            "Category pass completed"
        );
        report
    }

    async fn submit_document(&self, document: &StagedDocument, report: &mut CategoryReport) {
        let category = document.category;
        let payload = map_document(document, self.clock.now());
        let result = self.gateway.submit(category, &payload).await;

        let (status, message) = if result.success {
            info!(
                category = %category,
                ref_no = document.ref_no(),
                lines = payload.line_count(),
                message = %result.message,
                "Document submitted"
            );
            report.captured += 1;
            (StagingStatus::Captured, String::new())
        } else {
            error!(
                category = %category,
                ref_no = document.ref_no(),
                message = %result.message,
                "Document submission failed"
            );
            report.errored += 1;
            (StagingStatus::Errored, truncate_chars(&result.message, self.message_limit))
        };

        if let Err(err) = self
            .store
            .write_back(category.staging_table(), document.record_id(), status, &message)
            .await
        {
            report.write_back_failures += 1;
            error!(
                category = %category,
                ref_no = document.ref_no(),
                record_id = document.record_id(),
                status = %status,
                error = %err,
                "Failed to write submission outcome back to staging"
            );
        } else if status == StagingStatus::Errored {
            warn!(
                category = %category,
                record_id = document.record_id(),
                "Document parked as errored; it will not be resubmitted automatically"
            );
        }
    }
}
