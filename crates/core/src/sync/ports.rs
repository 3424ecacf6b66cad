//! Port interfaces for the staging store and the e-invoicing gateway

use async_trait::async_trait;
use einvoice_domain::{
    DocumentCategory, DocumentPayload, DocumentReference, Result, StagingRow, StagingStatus,
    StatusDocType, StatusRecord, SubmissionResult,
};

/// Access to the ERP staging area.
///
/// Implementations acquire a connection per call; nothing is held between
/// calls.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// All pending rows of a category, header and line columns per row.
    async fn fetch_pending(&self, category: DocumentCategory) -> Result<Vec<StagingRow>>;

    /// Set the processing state, status message and state timestamp of a
    /// staging record.
    async fn write_back(
        &self,
        staging_table: &str,
        record_id: i64,
        status: StagingStatus,
        message: &str,
    ) -> Result<()>;

    /// Documents captured by the gateway but not yet finalized.
    async fn captured_references(&self, doc_type: StatusDocType) -> Result<Vec<DocumentReference>>;

    /// Copy authority identifiers onto the originating ERP record.
    ///
    /// Returns `NotFound` when the ERP record does not exist.
    async fn apply_authority_fields(
        &self,
        erp_table: &str,
        record_id: i64,
        record: &StatusRecord,
    ) -> Result<()>;
}

/// The e-invoicing gateway.
#[async_trait]
pub trait EInvoiceGateway: Send + Sync {
    /// Submit one document. Every failure is reported in the result.
    async fn submit(&self, category: DocumentCategory, payload: &DocumentPayload)
        -> SubmissionResult;

    /// Current validation state of the given references.
    async fn query_status(
        &self,
        doc_type: StatusDocType,
        ref_nos: &[String],
    ) -> Result<Vec<StatusRecord>>;
}
