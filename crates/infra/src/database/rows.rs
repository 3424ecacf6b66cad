//! Typed reads of staging rows
//!
//! Every column is read by name and validated here, so a missing or
//! malformed value fails the extraction with an error naming the column
//! instead of surfacing later during payload mapping.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use einvoice_domain::{
    DocumentReference, EInvoiceError, Result, StagingHeader, StagingLine, StagingRow,
    StatusDocType,
};
use rusqlite::types::ValueRef;
use rusqlite::Row;

use crate::errors::InfraError;

/// Header and line columns of one extraction row.
pub(crate) fn staging_row(row: &Row<'_>) -> Result<StagingRow> {
    let header = StagingHeader {
        record_id: required(row, "doc_entry")?,
        ref_no: required_text(row, "ref_no")?,
        inv_date: date_time(row, "inv_date")?,
        post_date: date_time(row, "post_date")?,
        header_amount: decimal(row, "header_amount")?,
        remark: text(row, "remark")?,
        state: text(row, "state")?,
        city: text(row, "city")?,
        tel_no: text(row, "tel_no")?,
        address1: text(row, "address1")?,
        address2: text(row, "address2")?,
        address3: text(row, "address3")?,
        party_name: text(row, "party_name")?,
        tin: text(row, "tin")?,
        brn: text(row, "brn")?,
        email: text(row, "email")?,
        country: text(row, "country")?,
        payment_term: text(row, "payment_term")?,
        created_by: text(row, "created_by")?,
        currency: text(row, "currency")?,
        currency_rate: decimal(row, "currency_rate")?,
        created_date: offset_date_time(row, "created_date")?,
        msic_code: optional_text(row, "msic_code")?,
        note_type: optional_text(row, "note_type")?,
    };

    let line = StagingLine {
        uom: text(row, "uom")?,
        quantity: decimal(row, "quantity")?,
        unit_price: decimal(row, "unit_price")?,
        amount: decimal(row, "amount")?,
        description: text(row, "description")?,
        classification: text(row, "classification")?,
        tax_rate: decimal(row, "tax_rate")?,
        tax_amount: decimal(row, "tax_amount")?,
    };

    Ok(StagingRow { header, line })
}

/// One row of the captured-references lookup.
pub(crate) fn document_reference(row: &Row<'_>) -> Result<DocumentReference> {
    let doc_type: String = required(row, "doc_type")?;
    Ok(DocumentReference {
        doc_type: doc_type
            .parse::<StatusDocType>()
            .map_err(|err| EInvoiceError::column("doc_type", err))?,
        ref_no: required_text(row, "ref_no")?,
        staging_table: required_text(row, "staging_table")?,
        erp_table: required_text(row, "erp_table")?,
        record_id: required(row, "doc_entry")?,
    })
}

fn required<T: rusqlite::types::FromSql>(row: &Row<'_>, column: &str) -> Result<T> {
    row.get::<_, T>(column).map_err(|err| EInvoiceError::from(InfraError::from(err)))
}

fn optional_text(row: &Row<'_>, column: &str) -> Result<Option<String>> {
    let value: Option<String> = required(row, column)?;
    Ok(value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

/// Nullable text column; NULL reads as empty.
fn text(row: &Row<'_>, column: &str) -> Result<String> {
    Ok(required::<Option<String>>(row, column)?.unwrap_or_default())
}

fn required_text(row: &Row<'_>, column: &str) -> Result<String> {
    let value = text(row, column)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EInvoiceError::column(column, "value is empty"));
    }
    Ok(trimmed.to_string())
}

/// Decimal column. Text is parsed exactly; numeric storage from older
/// databases goes through its shortest decimal rendering.
fn decimal(row: &Row<'_>, column: &str) -> Result<BigDecimal> {
    let value = row.get_ref(column).map_err(|err| EInvoiceError::from(InfraError::from(err)))?;
    let parsed = match value {
        ValueRef::Integer(i) => Ok(BigDecimal::from(i)),
        ValueRef::Real(f) => BigDecimal::from_str(&f.to_string()),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|err| EInvoiceError::column(column, err))?;
            BigDecimal::from_str(text.trim())
        }
        ValueRef::Null => return Err(EInvoiceError::column(column, "value is NULL")),
        ValueRef::Blob(_) => return Err(EInvoiceError::column(column, "unexpected blob")),
    };
    parsed.map_err(|err| EInvoiceError::column(column, format!("malformed decimal: {err}")))
}

fn date_time(row: &Row<'_>, column: &str) -> Result<NaiveDateTime> {
    let value = required_text(row, column)?;
    parse_naive(&value).ok_or_else(|| EInvoiceError::column(column, format!("malformed date '{value}'")))
}

/// Empty or NULL reads as `None`; a naive value is taken as UTC.
fn offset_date_time(row: &Row<'_>, column: &str) -> Result<Option<DateTime<FixedOffset>>> {
    let Some(value) = optional_text(row, column)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(parsed));
    }
    if let Ok(parsed) = DateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(Some(parsed));
    }
    parse_naive(&value)
        .map(|naive| Some(naive.and_utc().fixed_offset()))
        .ok_or_else(|| EInvoiceError::column(column, format!("malformed timestamp '{value}'")))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
