//! Typed staging rows and the documents grouped from them
//!
//! Extraction returns one [`StagingRow`] per document line. Header columns
//! repeat on every line of the same reference; the first row of a group is
//! taken as the document header.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::category::{DocumentCategory, StatusDocType};

/// Header columns of a staging row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingHeader {
    /// Staging record id (`DocEntry`); write-backs are keyed by it.
    pub record_id: i64,
    pub ref_no: String,
    pub inv_date: NaiveDateTime,
    pub post_date: NaiveDateTime,
    pub header_amount: BigDecimal,
    pub remark: String,
    pub state: String,
    pub city: String,
    pub tel_no: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub party_name: String,
    pub tin: String,
    pub brn: String,
    pub email: String,
    pub country: String,
    pub payment_term: String,
    pub created_by: String,
    pub currency: String,
    pub currency_rate: BigDecimal,
    /// `None` when the staging column is empty.
    pub created_date: Option<DateTime<FixedOffset>>,
    /// Purchase invoices only.
    pub msic_code: Option<String>,
    /// Credit/debit notes only.
    pub note_type: Option<String>,
}

/// Line-item columns of a staging row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingLine {
    pub uom: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub amount: BigDecimal,
    pub description: String,
    pub classification: String,
    pub tax_rate: BigDecimal,
    pub tax_amount: BigDecimal,
}

/// One row returned by a category extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingRow {
    pub header: StagingHeader,
    pub line: StagingLine,
}

/// A document assembled from every row sharing one reference number.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedDocument {
    pub category: DocumentCategory,
    pub header: StagingHeader,
    pub lines: Vec<StagingLine>,
}

impl StagedDocument {
    pub fn ref_no(&self) -> &str {
        &self.header.ref_no
    }

    pub fn record_id(&self) -> i64 {
        self.header.record_id
    }
}

/// A previously captured document awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub doc_type: StatusDocType,
    pub ref_no: String,
    /// Staging table the record lives in (e.g. `EINV`).
    pub staging_table: String,
    /// ERP table receiving the authority identifiers.
    pub erp_table: String,
    pub record_id: i64,
}
