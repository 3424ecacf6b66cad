use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use einvoice_core::{EInvoiceGateway, StagingStore};
use einvoice_domain::{
    DocumentCategory, DocumentPayload, DocumentReference, EInvoiceError, Result as DomainResult,
    StagingRow, StagingStatus, StatusDocType, StatusRecord, SubmissionResult,
};

/// One recorded staging write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBack {
    pub table: String,
    pub record_id: i64,
    pub status: StagingStatus,
    pub message: String,
}

/// In-memory staging store.
///
/// Categories without seeded rows return an empty extraction.
#[derive(Default)]
pub struct FakeStagingStore {
    pending: Mutex<HashMap<DocumentCategory, Vec<StagingRow>>>,
    failing_categories: Mutex<HashSet<DocumentCategory>>,
    references: Mutex<HashMap<StatusDocType, Vec<DocumentReference>>>,
    failing_write_backs: Mutex<HashSet<i64>>,
    failing_authority: Mutex<HashSet<i64>>,
    pub fetches: Mutex<Vec<DocumentCategory>>,
    pub writes: Mutex<Vec<WriteBack>>,
    pub authority_updates: Mutex<Vec<(String, i64, StatusRecord)>>,
}

impl FakeStagingStore {
    pub fn with_rows(self, category: DocumentCategory, rows: Vec<StagingRow>) -> Self {
        self.pending.lock().unwrap().insert(category, rows);
        self
    }

    pub fn failing_extraction(self, category: DocumentCategory) -> Self {
        self.failing_categories.lock().unwrap().insert(category);
        self
    }

    pub fn with_references(self, doc_type: StatusDocType, refs: Vec<DocumentReference>) -> Self {
        self.references.lock().unwrap().insert(doc_type, refs);
        self
    }

    pub fn failing_write_back(self, record_id: i64) -> Self {
        self.failing_write_backs.lock().unwrap().insert(record_id);
        self
    }

    pub fn failing_authority_update(self, record_id: i64) -> Self {
        self.failing_authority.lock().unwrap().insert(record_id);
        self
    }

    pub fn writes(&self) -> Vec<WriteBack> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<DocumentCategory> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn authority_updates(&self) -> Vec<(String, i64, StatusRecord)> {
        self.authority_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl StagingStore for FakeStagingStore {
    async fn fetch_pending(&self, category: DocumentCategory) -> DomainResult<Vec<StagingRow>> {
        self.fetches.lock().unwrap().push(category);
        if self.failing_categories.lock().unwrap().contains(&category) {
            return Err(EInvoiceError::Database(format!("extraction failed for {category}")));
        }
        Ok(self.pending.lock().unwrap().get(&category).cloned().unwrap_or_default())
    }

    async fn write_back(
        &self,
        staging_table: &str,
        record_id: i64,
        status: StagingStatus,
        message: &str,
    ) -> DomainResult<()> {
        if self.failing_write_backs.lock().unwrap().contains(&record_id) {
            return Err(EInvoiceError::Database("write-back rejected".into()));
        }
        self.writes.lock().unwrap().push(WriteBack {
            table: staging_table.to_string(),
            record_id,
            status,
            message: message.to_string(),
        });
        Ok(())
    }

    async fn captured_references(
        &self,
        doc_type: StatusDocType,
    ) -> DomainResult<Vec<DocumentReference>> {
        Ok(self.references.lock().unwrap().get(&doc_type).cloned().unwrap_or_default())
    }

    async fn apply_authority_fields(
        &self,
        erp_table: &str,
        record_id: i64,
        record: &StatusRecord,
    ) -> DomainResult<()> {
        if self.failing_authority.lock().unwrap().contains(&record_id) {
            return Err(EInvoiceError::NotFound(format!("{erp_table}/{record_id}")));
        }
        self.authority_updates.lock().unwrap().push((
            erp_table.to_string(),
            record_id,
            record.clone(),
        ));
        Ok(())
    }
}

/// Scripted gateway. Submissions succeed unless a failure is registered for
/// the reference number.
#[derive(Default)]
pub struct FakeGateway {
    failures: Mutex<HashMap<String, String>>,
    statuses: Mutex<HashMap<StatusDocType, Vec<StatusRecord>>>,
    failing_status: Mutex<HashSet<StatusDocType>>,
    pub submissions: Mutex<Vec<(DocumentCategory, DocumentPayload)>>,
    pub status_queries: Mutex<Vec<(StatusDocType, Vec<String>)>>,
}

impl FakeGateway {
    pub fn failing(self, ref_no: &str, message: &str) -> Self {
        self.failures.lock().unwrap().insert(ref_no.to_string(), message.to_string());
        self
    }

    pub fn with_statuses(self, doc_type: StatusDocType, records: Vec<StatusRecord>) -> Self {
        self.statuses.lock().unwrap().insert(doc_type, records);
        self
    }

    pub fn failing_status_query(self, doc_type: StatusDocType) -> Self {
        self.failing_status.lock().unwrap().insert(doc_type);
        self
    }

    pub fn submissions(&self) -> Vec<(DocumentCategory, DocumentPayload)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn status_queries(&self) -> Vec<(StatusDocType, Vec<String>)> {
        self.status_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EInvoiceGateway for FakeGateway {
    async fn submit(
        &self,
        category: DocumentCategory,
        payload: &DocumentPayload,
    ) -> SubmissionResult {
        self.submissions.lock().unwrap().push((category, payload.clone()));
        match self.failures.lock().unwrap().get(payload.ref_no()) {
            Some(message) => SubmissionResult::failed(message.clone()),
            None => SubmissionResult::succeeded(format!(
                "{} RefNo {} created successfully. API Message: ok",
                category.label(),
                payload.ref_no()
            )),
        }
    }

    async fn query_status(
        &self,
        doc_type: StatusDocType,
        ref_nos: &[String],
    ) -> DomainResult<Vec<StatusRecord>> {
        self.status_queries.lock().unwrap().push((doc_type, ref_nos.to_vec()));
        if self.failing_status.lock().unwrap().contains(&doc_type) {
            return Err(EInvoiceError::Network("status endpoint returned 503".into()));
        }
        Ok(self.statuses.lock().unwrap().get(&doc_type).cloned().unwrap_or_default())
    }
}
