use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use einvoice_domain::{
    DocumentReference, StagingHeader, StagingLine, StagingRow, StatusDocType, StatusRecord,
};

/// A staging row with plausible defaults; the header is derived from the
/// record id so tests can tell headers apart.
pub fn staging_row(record_id: i64, ref_no: &str, description: &str) -> StagingRow {
    let inv = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let post = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
    StagingRow {
        header: StagingHeader {
            record_id,
            ref_no: ref_no.to_string(),
            inv_date: inv,
            post_date: post,
            header_amount: BigDecimal::from(100 * record_id),
            remark: String::new(),
            state: "Selangor".into(),
            city: "Petaling Jaya".into(),
            tel_no: "+60377777777".into(),
            address1: format!("{record_id} Jalan Ujian"),
            address2: String::new(),
            address3: String::new(),
            party_name: format!("Customer {record_id}"),
            tin: format!("TIN{record_id}"),
            brn: format!("BRN{record_id}"),
            email: "billing@customer.test".into(),
            country: "MYS".into(),
            payment_term: "30D".into(),
            created_by: "manager".into(),
            currency: "MYR".into(),
            currency_rate: BigDecimal::from(1),
            created_date: None,
            msic_code: None,
            note_type: None,
        },
        line: StagingLine {
            uom: "EA".into(),
            quantity: BigDecimal::from(1),
            unit_price: BigDecimal::from(100),
            amount: BigDecimal::from(100),
            description: description.to_string(),
            classification: "022".into(),
            tax_rate: BigDecimal::from(6),
            tax_amount: BigDecimal::from(6),
        },
    }
}

pub fn reference(doc_type: StatusDocType, ref_no: &str, record_id: i64) -> DocumentReference {
    DocumentReference {
        doc_type,
        ref_no: ref_no.to_string(),
        staging_table: "EINV".into(),
        erp_table: "OINV".into(),
        record_id,
    }
}

pub fn status(doc_type: StatusDocType, ref_no: &str, status: &str) -> StatusRecord {
    StatusRecord {
        doc_type: doc_type.to_string(),
        ref_no: ref_no.to_string(),
        doc_date: None,
        authority_id: format!("IRBM-{ref_no}"),
        validation_date: None,
        validation_link: format!("https://portal.test/{ref_no}"),
        status: status.to_string(),
    }
}
