//! Reconciliation of captured documents against gateway validation status

use std::sync::Arc;

use einvoice_domain::{
    DocumentReference, ReconciliationReport, StagingStatus, StatusDocType, StatusRecord,
};
use tracing::{debug, error, info, warn};

use super::ports::{EInvoiceGateway, StagingStore};

/// Finalizes captured documents the gateway reports as validated.
pub struct ReconciliationService {
    store: Arc<dyn StagingStore>,
    gateway: Arc<dyn EInvoiceGateway>,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn StagingStore>, gateway: Arc<dyn EInvoiceGateway>) -> Self {
        Self { store, gateway }
    }

    /// Check every tracked document type once.
    ///
    /// Only an exact `"Validated"` status finalizes a record. Anything else is
    /// left for the next pass.
    pub async fn run_pass(&self) -> ReconciliationReport {
        let mut report = ReconciliationReport::default();
        for doc_type in StatusDocType::TRACKED {
            self.reconcile_doc_type(doc_type, &mut report).await;
        }

        info!(
            checked = report.references_checked,
            validated = report.validated,
            finalized = report.finalized,
            authority_updates = report.authority_updates,
            skipped = report.skipped,
            "Reconciliation pass completed"
        );
        report
    }

    async fn reconcile_doc_type(&self, doc_type: StatusDocType, report: &mut ReconciliationReport) {
        let references = match self.store.captured_references(doc_type).await {
            Ok(references) => references,
            Err(err) => {
                report.failed_doc_types += 1;
                error!(doc_type = %doc_type, error = %err, "Failed to load captured references");
                return;
            }
        };
        if references.is_empty() {
            debug!(doc_type = %doc_type, "No captured documents awaiting validation");
            return;
        }
        report.references_checked += references.len();

        let ref_nos: Vec<String> = references.iter().map(|r| r.ref_no.clone()).collect();
        let statuses = match self.gateway.query_status(doc_type, &ref_nos).await {
            Ok(statuses) => statuses,
            Err(err) => {
                report.failed_doc_types += 1;
                warn!(doc_type = %doc_type, error = %err, "Status query failed; will retry next cycle");
                return;
            }
        };
        if statuses.is_empty() {
            debug!(doc_type = %doc_type, "Gateway returned no status records");
            return;
        }

        for record in statuses.iter().filter(|r| r.is_validated()) {
            report.validated += 1;
            match references.iter().find(|r| r.ref_no == record.ref_no) {
                Some(reference) => self.finalize(reference, record, report).await,
                None => {
                    report.skipped += 1;
                    warn!(
                        doc_type = %doc_type,
                        ref_no = %record.ref_no,
                        "Validated status has no matching captured reference"
                    );
                }
            }
        }
    }

    /// Two independent write-backs; a failure in one does not skip the other.
    async fn finalize(
        &self,
        reference: &DocumentReference,
        record: &StatusRecord,
        report: &mut ReconciliationReport,
    ) {
        match self
            .store
            .write_back(&reference.staging_table, reference.record_id, StagingStatus::Finalized, "")
            .await
        {
            Ok(()) => report.finalized += 1,
            Err(err) => {
                report.write_back_failures += 1;
                error!(
                    table = %reference.staging_table,
                    record_id = reference.record_id,
                    ref_no = %reference.ref_no,
                    error = %err,
                    "Failed to finalize staging record"
                );
            }
        }

        match self
            .store
            .apply_authority_fields(&reference.erp_table, reference.record_id, record)
            .await
        {
            Ok(()) => {
                report.authority_updates += 1;
                info!(
                    ref_no = %reference.ref_no,
                    erp_table = %reference.erp_table,
                    authority_id = %record.authority_id,
                    "Document validated"
                );
            }
            Err(err) => {
                report.write_back_failures += 1;
                error!(
                    erp_table = %reference.erp_table,
                    record_id = reference.record_id,
                    ref_no = %reference.ref_no,
                    error = %err,
                    "Failed to push authority identifiers to ERP record"
                );
            }
        }
    }
}
