//! SQLite-backed staging store
//!
//! Implements the `StagingStore` port on top of [`StagingDb`]. Every call
//! checks a connection out on a blocking thread, runs parameterized SQL, and
//! hands the connection back before returning.

use std::sync::Arc;

use async_trait::async_trait;
use einvoice_core::StagingStore;
use einvoice_domain::{
    DocumentCategory, DocumentReference, EInvoiceError, Result, StagingRow, StagingStatus,
    StatusDocType, StatusRecord,
};
use rusqlite::{params, Connection};
use tokio::task;
use tracing::debug;

use super::manager::StagingDb;
use super::rows::{document_reference, staging_row};
use crate::errors::InfraError;

const PENDING_ROWS_SQL: &str = "
    SELECT d.doc_entry, d.ref_no, d.inv_date, d.post_date, d.header_amount, d.remark, d.state,
           d.city, d.tel_no, d.address1, d.address2, d.address3, d.party_name, d.tin, d.brn,
           d.email, d.country, d.payment_term, d.created_by, d.currency, d.currency_rate,
           d.created_date, d.msic_code, d.note_type,
           l.uom, l.quantity, l.unit_price, l.amount, l.description, l.classification,
           l.tax_rate, l.tax_amount
      FROM staging_document d
      JOIN staging_line l
        ON l.staging_table = d.staging_table AND l.doc_entry = d.doc_entry
     WHERE d.staging_table = ?1 AND d.is_captured = ?2
     ORDER BY d.doc_entry, l.line_num";

const WRITE_BACK_SQL: &str = "
    UPDATE staging_document
       SET is_captured = ?1, status_msg = ?2,
           update_date = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
     WHERE staging_table = ?3 AND doc_entry = ?4";

const FINALIZE_SQL: &str = "
    UPDATE staging_document
       SET is_captured = ?1, status_msg = ?2,
           captured_date = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
     WHERE staging_table = ?3 AND doc_entry = ?4";

const CAPTURED_REFERENCES_SQL: &str = "
    SELECT staging_table, erp_table, doc_entry, ref_no, doc_type
      FROM staging_document
     WHERE doc_type = ?1 AND is_captured = ?2
     ORDER BY staging_table, doc_entry";

const AUTHORITY_FIELDS_SQL: &str = "
    UPDATE erp_document
       SET einv_irbm_no = ?1, einv_val_date = ?2, einv_val_link = ?3
     WHERE erp_table = ?4 AND doc_entry = ?5";

/// [`StagingStore`] over the bundled SQLite staging schema.
pub struct SqliteStagingStore {
    db: Arc<StagingDb>,
}

impl SqliteStagingStore {
    pub fn new(db: Arc<StagingDb>) -> Self {
        Self { db }
    }

    fn fetch_pending_rows(conn: &Connection, category: DocumentCategory) -> Result<Vec<StagingRow>> {
        let mut stmt = conn.prepare(PENDING_ROWS_SQL).map_err(map_sql_error)?;
        let mut rows = stmt
            .query(params![category.staging_table(), StagingStatus::Staged.code()])
            .map_err(map_sql_error)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sql_error)? {
            out.push(staging_row(row)?);
        }
        Ok(out)
    }

    fn update_status(
        conn: &Connection,
        staging_table: &str,
        record_id: i64,
        status: StagingStatus,
        message: &str,
    ) -> Result<()> {
        let sql = match status {
            StagingStatus::Finalized => FINALIZE_SQL,
            StagingStatus::Staged | StagingStatus::Captured | StagingStatus::Errored => {
                WRITE_BACK_SQL
            }
        };

        let changed = conn
            .execute(sql, params![status.code(), message, staging_table, record_id])
            .map_err(map_sql_error)?;
        if changed == 0 {
            return Err(EInvoiceError::NotFound(format!(
                "staging record {staging_table}/{record_id} does not exist"
            )));
        }

        debug!(
            table = staging_table,
            record_id,
            status = %status,
            timestamp_column = status.timestamp_column(),
            "Staging record updated"
        );
        Ok(())
    }

    fn fetch_captured(conn: &Connection, doc_type: StatusDocType) -> Result<Vec<DocumentReference>> {
        let mut stmt = conn.prepare(CAPTURED_REFERENCES_SQL).map_err(map_sql_error)?;
        let mut rows =
            stmt.query(params![doc_type.code(), StagingStatus::Captured.code()]).map_err(map_sql_error)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sql_error)? {
            out.push(document_reference(row)?);
        }
        Ok(out)
    }

    fn update_erp_record(
        conn: &Connection,
        erp_table: &str,
        record_id: i64,
        record: &StatusRecord,
    ) -> Result<()> {
        let changed = conn
            .execute(
                AUTHORITY_FIELDS_SQL,
                params![
                    record.authority_id,
                    record.validation_date_text(),
                    record.validation_link,
                    erp_table,
                    record_id
                ],
            )
            .map_err(map_sql_error)?;
        if changed == 0 {
            return Err(EInvoiceError::NotFound(format!(
                "ERP record {erp_table}/{record_id} does not exist"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StagingStore for SqliteStagingStore {
    async fn fetch_pending(&self, category: DocumentCategory) -> Result<Vec<StagingRow>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<StagingRow>> {
            let conn = db.get_connection()?;
            Self::fetch_pending_rows(&conn, category)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn write_back(
        &self,
        staging_table: &str,
        record_id: i64,
        status: StagingStatus,
        message: &str,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let staging_table = staging_table.to_string();
        let message = message.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            Self::update_status(&conn, &staging_table, record_id, status, &message)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn captured_references(&self, doc_type: StatusDocType) -> Result<Vec<DocumentReference>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<DocumentReference>> {
            let conn = db.get_connection()?;
            Self::fetch_captured(&conn, doc_type)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn apply_authority_fields(
        &self,
        erp_table: &str,
        record_id: i64,
        record: &StatusRecord,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let erp_table = erp_table.to_string();
        let record = record.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            Self::update_erp_record(&conn, &erp_table, record_id, &record)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_sql_error(err: rusqlite::Error) -> EInvoiceError {
    EInvoiceError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> EInvoiceError {
    EInvoiceError::from(InfraError::from(err))
}
