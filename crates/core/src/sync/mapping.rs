//! Mapping of staged documents onto gateway payloads
//!
//! All categories share the same staging columns; they differ in which
//! payload shape they feed and in a handful of date/code fields.

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, FixedOffset, Utc};
use einvoice_domain::constants::{BNP_TYPE_BRN, LINE_TAX_TYPE};
use einvoice_domain::{
    ApNotePayload, ArNotePayload, DocumentCategory, DocumentPayload, InvoiceHeader, InvoicePart,
    NoteHeader, NotePart, PurchaseInvoicePayload, SalesInvoicePayload, ShipRecipient,
    StagedDocument, StagingHeader, StagingLine,
};

/// Build the gateway payload for a staged document.
///
/// `now` stands in for the creation timestamp when the staging row has none.
pub fn map_document(document: &StagedDocument, now: DateTime<Utc>) -> DocumentPayload {
    let header = &document.header;
    match document.category {
        DocumentCategory::SalesInvoice | DocumentCategory::DownPaymentInvoice => {
            DocumentPayload::Sales(SalesInvoicePayload {
                header: invoice_header(header, &document.lines, now),
                cust_po: String::new(),
                po_date: Some(header.inv_date),
                declaration_no: String::new(),
                discount_voucher_adj: BigDecimal::zero(),
                discount_voucher: String::new(),
            })
        }
        DocumentCategory::PurchaseInvoice => DocumentPayload::Purchase(PurchaseInvoicePayload {
            header: invoice_header(header, &document.lines, now),
            vendor_inv_no: String::new(),
            rec_date: header.inv_date,
            import_declaration_no: String::new(),
            msic_code: header.msic_code.clone().unwrap_or_default(),
        }),
        DocumentCategory::ArCreditDebitNote => DocumentPayload::ArNote(ArNotePayload {
            header: note_header(header, now),
            parts: document.lines.iter().map(note_part).collect(),
        }),
        DocumentCategory::ApCreditDebitNote => DocumentPayload::ApNote(ApNotePayload {
            header: note_header(header, now),
            parts: document.lines.iter().map(note_part).collect(),
        }),
    }
}

fn created_date(header: &StagingHeader, now: DateTime<Utc>) -> DateTime<FixedOffset> {
    header.created_date.unwrap_or_else(|| now.fixed_offset())
}

fn invoice_header(header: &StagingHeader, lines: &[StagingLine], now: DateTime<Utc>) -> InvoiceHeader {
    InvoiceHeader {
        ref_no: header.ref_no.clone(),
        inv_date: header.inv_date,
        post_date: header.post_date,
        payment_term: header.payment_term.clone(),
        header_amount: header.header_amount.clone(),
        rounding_adj: BigDecimal::zero(),
        created_by: header.created_by.clone(),
        created_date: created_date(header, now),
        remark: header.remark.clone(),
        tin: header.tin.clone(),
        brn: header.brn.clone(),
        bnp_type: BNP_TYPE_BRN.to_string(),
        b_name: header.party_name.clone(),
        address1: header.address1.clone(),
        address2: header.address2.clone(),
        address3: header.address3.clone(),
        post_code: String::new(),
        city: header.city.clone(),
        state: header.state.clone(),
        country: header.country.clone(),
        tel_no: header.tel_no.clone(),
        fax_no: String::new(),
        email: header.email.clone(),
        currency: header.currency.clone(),
        currency_rate: header.currency_rate.clone(),
        terms: String::new(),
        custom_form1: String::new(),
        incoterm: String::new(),
        fta: String::new(),
        auth_no_cert_exp: String::new(),
        custom_form2: String::new(),
        country_of_origin: String::new(),
        det_other_charge: String::new(),
        parts: lines.iter().map(invoice_part).collect(),
    }
}

fn invoice_part(line: &StagingLine) -> InvoicePart {
    InvoicePart {
        order_qty: line.quantity.clone(),
        uom: line.uom.clone(),
        unit_price: line.unit_price.clone(),
        amount: line.amount.clone(),
        classification: line.classification.clone(),
        description: line.description.clone(),
        tax_type: LINE_TAX_TYPE.to_string(),
        tax_rate: line.tax_rate.clone(),
        tax_amount: line.tax_amount.clone(),
        ..InvoicePart::default()
    }
}

fn note_header(header: &StagingHeader, now: DateTime<Utc>) -> NoteHeader {
    NoteHeader {
        ref_no: header.ref_no.clone(),
        date: header.post_date,
        note_type: header.note_type.clone().unwrap_or_default(),
        header_amount: header.header_amount.clone(),
        created_by: header.created_by.clone(),
        created_date: created_date(header, now),
        remark: header.remark.clone(),
        tin: header.tin.clone(),
        brn: header.brn.clone(),
        bnp_type: BNP_TYPE_BRN.to_string(),
        b_name: header.party_name.clone(),
        address1: header.address1.clone(),
        address2: header.address2.clone(),
        address3: header.address3.clone(),
        post_code: String::new(),
        city: header.city.clone(),
        state: header.state.clone(),
        country: header.country.clone(),
        tel_no: header.tel_no.clone(),
        fax_no: String::new(),
        email: header.email.clone(),
        currency: header.currency.clone(),
        currency_rate: header.currency_rate.clone(),
        terms: String::new(),
        ship_recipient: ShipRecipient::default(),
        custom_form1: String::new(),
        incoterm: String::new(),
        fta: String::new(),
        auth_no_cert_exp: String::new(),
        custom_form2: String::new(),
        country_of_origin: String::new(),
        det_other_charge: BigDecimal::zero(),
        e_inv_ref_no: String::new(),
        self_bill: false,
        msic_code: String::new(),
    }
}

fn note_part(line: &StagingLine) -> NotePart {
    NotePart {
        qty: line.quantity.clone(),
        uom: line.uom.clone(),
        unit_price: line.unit_price.clone(),
        amount: line.amount.clone(),
        classification: line.classification.clone(),
        description: line.description.clone(),
        tax_type: LINE_TAX_TYPE.to_string(),
        tax_rate: line.tax_rate.clone(),
        tax_amount: line.tax_amount.clone(),
        ..NotePart::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use einvoice_domain::{StagingHeader, StagingLine};

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn document(category: DocumentCategory) -> StagedDocument {
        let inv = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let post = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().and_hms_opt(0, 0, 0).unwrap();
        StagedDocument {
            category,
            header: StagingHeader {
                record_id: 77,
                ref_no: "5001".into(),
                inv_date: inv,
                post_date: post,
                header_amount: dec("212.0"),
                remark: "PO 88".into(),
                state: "Selangor".into(),
                city: "Shah Alam".into(),
                tel_no: "+60355555555".into(),
                address1: "Lot 1".into(),
                address2: String::new(),
                address3: String::new(),
                party_name: "Buyer Bhd".into(),
                tin: "C99".into(),
                brn: "BRN99".into(),
                email: "buyer@test".into(),
                country: "MYS".into(),
                payment_term: "COD".into(),
                created_by: String::new(),
                currency: "MYR".into(),
                currency_rate: dec("1.0"),
                created_date: None,
                msic_code: Some("46510".into()),
                note_type: Some("DN".into()),
            },
            lines: vec![
                StagingLine {
                    uom: "EA".into(),
                    quantity: dec("2.0"),
                    unit_price: dec("50.0"),
                    amount: dec("100.0"),
                    description: "Widget".into(),
                    classification: "022".into(),
                    tax_rate: dec("6.0"),
                    tax_amount: dec("6.0"),
                },
                StagingLine {
                    uom: "HR".into(),
                    quantity: dec("1.0"),
                    unit_price: dec("100.0"),
                    amount: dec("100.0"),
                    description: "Install".into(),
                    classification: "022".into(),
                    tax_rate: dec("6.0"),
                    tax_amount: dec("6.0"),
                },
            ],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 4, 0, 0).unwrap()
    }

    #[test]
    fn sales_invoice_uses_invoice_date_as_po_date() {
        let DocumentPayload::Sales(payload) = map_document(&document(DocumentCategory::SalesInvoice), now())
        else {
            panic!("sales category must map to a sales payload");
        };
        assert_eq!(payload.po_date, Some(payload.header.inv_date));
        assert_eq!(payload.header.bnp_type, "BRN");
        assert_eq!(payload.header.b_name, "Buyer Bhd");
        assert_eq!(payload.header.parts.len(), 2);
        assert!(payload.header.parts.iter().all(|p| p.tax_type == "06"));
    }

    #[test]
    fn down_payment_maps_to_sales_shape() {
        let payload = map_document(&document(DocumentCategory::DownPaymentInvoice), now());
        assert!(matches!(payload, DocumentPayload::Sales(_)));
    }

    #[test]
    fn purchase_invoice_carries_receive_date_and_msic() {
        let DocumentPayload::Purchase(payload) =
            map_document(&document(DocumentCategory::PurchaseInvoice), now())
        else {
            panic!("purchase category must map to a purchase payload");
        };
        assert_eq!(payload.rec_date, payload.header.inv_date);
        assert_eq!(payload.msic_code, "46510");
    }

    #[test]
    fn notes_use_posting_date_and_row_type() {
        let doc = document(DocumentCategory::ArCreditDebitNote);
        let DocumentPayload::ArNote(payload) = map_document(&doc, now()) else {
            panic!("AR note category must map to an AR note payload");
        };
        assert_eq!(payload.header.date, doc.header.post_date);
        assert_eq!(payload.header.note_type, "DN");
        assert_eq!(payload.parts[0].qty, dec("2"));

        let ap = map_document(&document(DocumentCategory::ApCreditDebitNote), now());
        assert!(matches!(ap, DocumentPayload::ApNote(ref p) if p.parts.len() == 2));
    }

    #[test]
    fn missing_creation_date_falls_back_to_now() {
        let payload = map_document(&document(DocumentCategory::SalesInvoice), now());
        let DocumentPayload::Sales(sales) = payload else { panic!("expected sales payload") };
        assert_eq!(sales.header.created_date, now().fixed_offset());
    }

    #[test]
    fn empty_creator_is_sent_as_staged() {
        let doc = document(DocumentCategory::SalesInvoice);
        assert!(doc.header.created_by.is_empty());

        let DocumentPayload::Sales(sales) = map_document(&doc, now()) else {
            panic!("expected sales payload")
        };
        assert_eq!(sales.header.created_by, "");

        let DocumentPayload::ArNote(note) =
            map_document(&document(DocumentCategory::ArCreditDebitNote), now())
        else {
            panic!("expected AR note payload")
        };
        assert_eq!(note.header.created_by, "");
    }

    #[test]
    fn amounts_are_carried_without_rounding() {
        let mut doc = document(DocumentCategory::PurchaseInvoice);
        doc.header.header_amount = dec("1234567.89");
        doc.header.currency_rate = dec("4.4725");
        doc.lines[0].unit_price = dec("0.10");
        doc.lines[0].quantity = dec("3");

        let DocumentPayload::Purchase(p) = map_document(&doc, now()) else {
            panic!("expected purchase payload")
        };
        assert_eq!(p.header.header_amount, dec("1234567.89"));
        assert_eq!(p.header.currency_rate, dec("4.4725"));
        assert_eq!(&p.header.parts[0].unit_price * &p.header.parts[0].order_qty, dec("0.30"));
        assert_eq!(p.header.rounding_adj, BigDecimal::zero());
    }

    #[test]
    fn staged_creation_date_wins_over_now() {
        let mut doc = document(DocumentCategory::PurchaseInvoice);
        let staged = DateTime::parse_from_rfc3339("2025-03-10T08:00:00+08:00").unwrap();
        doc.header.created_date = Some(staged);
        doc.header.created_by = "clerk".into();

        let DocumentPayload::Purchase(p) = map_document(&doc, now()) else {
            panic!("expected purchase payload")
        };
        assert_eq!(p.header.created_date, staged);
        assert_eq!(p.header.created_by, "clerk");
    }
}
