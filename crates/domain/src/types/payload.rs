//! Gateway submission payloads
//!
//! Field names follow the gateway's wire contract (PascalCase, with a few
//! upper-case acronyms). Optional fields the staging store does not supply
//! are sent as empty strings or zero. Amounts are decimals written as JSON
//! numbers.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Invoice line item (`InvoicePart`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoicePart {
    #[serde(with = "super::decimal")]
    pub order_qty: BigDecimal,
    #[serde(rename = "UOM")]
    pub uom: String,
    #[serde(with = "super::decimal")]
    pub unit_price: BigDecimal,
    #[serde(with = "super::decimal")]
    pub amount: BigDecimal,
    #[serde(with = "super::decimal")]
    pub dis_amt: BigDecimal,
    #[serde(with = "super::decimal")]
    pub dis_per: BigDecimal,
    pub reference: String,
    pub classification: String,
    pub description: String,
    pub tax_type: String,
    #[serde(with = "super::decimal")]
    pub tax_rate: BigDecimal,
    #[serde(with = "super::decimal")]
    pub tax_amount: BigDecimal,
    pub tax_exemption: String,
    #[serde(with = "super::decimal")]
    pub tax_exemption_amt: BigDecimal,
}

/// Fields shared by sales and purchase invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvoiceHeader {
    pub ref_no: String,
    pub inv_date: NaiveDateTime,
    pub post_date: NaiveDateTime,
    pub payment_term: String,
    #[serde(with = "super::decimal")]
    pub header_amount: BigDecimal,
    #[serde(with = "super::decimal")]
    pub rounding_adj: BigDecimal,
    pub created_by: String,
    pub created_date: DateTime<FixedOffset>,
    pub remark: String,
    #[serde(rename = "TIN")]
    pub tin: String,
    #[serde(rename = "BRN")]
    pub brn: String,
    #[serde(rename = "BNPType")]
    pub bnp_type: String,
    pub b_name: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub post_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub tel_no: String,
    pub fax_no: String,
    pub email: String,
    pub currency: String,
    #[serde(with = "super::decimal")]
    pub currency_rate: BigDecimal,
    pub terms: String,
    pub custom_form1: String,
    pub incoterm: String,
    #[serde(rename = "FTA")]
    pub fta: String,
    pub auth_no_cert_exp: String,
    pub custom_form2: String,
    pub country_of_origin: String,
    pub det_other_charge: String,
    #[serde(rename = "InvoicePart")]
    pub parts: Vec<InvoicePart>,
}

/// Sales and down-payment invoices (`api/salesinvoice/create`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoicePayload {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    #[serde(rename = "CustPO")]
    pub cust_po: String,
    #[serde(rename = "PODate")]
    pub po_date: Option<NaiveDateTime>,
    #[serde(rename = "DeclarationNo")]
    pub declaration_no: String,
    #[serde(rename = "DiscountVoucherAdj")]
    #[serde(with = "super::decimal")]
    pub discount_voucher_adj: BigDecimal,
    #[serde(rename = "DiscountVoucher")]
    pub discount_voucher: String,
}

/// Purchase invoices (`api/purchaseinvoice/create`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInvoicePayload {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    #[serde(rename = "VendorInvNo")]
    pub vendor_inv_no: String,
    #[serde(rename = "RecDate")]
    pub rec_date: NaiveDateTime,
    #[serde(rename = "ImportDeclarationNo")]
    pub import_declaration_no: String,
    #[serde(rename = "MSICCode")]
    pub msic_code: String,
}

/// Credit/debit note line item (`arcndnpart` / `apcndnpart`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotePart {
    pub part_no: String,
    #[serde(with = "super::decimal")]
    pub qty: BigDecimal,
    #[serde(rename = "UOM")]
    pub uom: String,
    #[serde(with = "super::decimal")]
    pub unit_price: BigDecimal,
    #[serde(with = "super::decimal")]
    pub amount: BigDecimal,
    pub classification: String,
    pub description: String,
    pub tax_type: String,
    #[serde(with = "super::decimal")]
    pub tax_rate: BigDecimal,
    #[serde(with = "super::decimal")]
    pub tax_amount: BigDecimal,
    pub tax_exemption: String,
    #[serde(with = "super::decimal")]
    pub tax_exemption_amt: BigDecimal,
}

/// Shipping recipient block of a credit/debit note. Not staged today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipRecipient {
    #[serde(rename = "ShipReceiptName")]
    pub name: String,
    #[serde(rename = "ShipReceiptAddress1")]
    pub address1: String,
    #[serde(rename = "ShipReceiptAddress2")]
    pub address2: String,
    #[serde(rename = "ShipReceiptAddress3")]
    pub address3: String,
    #[serde(rename = "ShipReceiptTIN")]
    pub tin: String,
    #[serde(rename = "ShipReceiptBRN")]
    pub brn: String,
    #[serde(rename = "ShipReceiptBNPType")]
    pub bnp_type: String,
    #[serde(rename = "ShipReceiptPostcode")]
    pub post_code: String,
    #[serde(rename = "ShipReceiptCity")]
    pub city: String,
    #[serde(rename = "ShipReceiptState")]
    pub state: String,
    #[serde(rename = "ShipReceiptCountry")]
    pub country: String,
}

/// Header of an AR or AP credit/debit note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteHeader {
    pub ref_no: String,
    pub date: NaiveDateTime,
    #[serde(rename = "Type")]
    pub note_type: String,
    #[serde(with = "super::decimal")]
    pub header_amount: BigDecimal,
    pub created_by: String,
    pub created_date: DateTime<FixedOffset>,
    pub remark: String,
    #[serde(rename = "TIN")]
    pub tin: String,
    #[serde(rename = "BRN")]
    pub brn: String,
    #[serde(rename = "BNPType")]
    pub bnp_type: String,
    pub b_name: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub post_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub tel_no: String,
    pub fax_no: String,
    pub email: String,
    pub currency: String,
    #[serde(with = "super::decimal")]
    pub currency_rate: BigDecimal,
    pub terms: String,
    #[serde(flatten)]
    pub ship_recipient: ShipRecipient,
    pub custom_form1: String,
    pub incoterm: String,
    #[serde(rename = "FTA")]
    pub fta: String,
    pub auth_no_cert_exp: String,
    pub custom_form2: String,
    pub country_of_origin: String,
    #[serde(with = "super::decimal")]
    pub det_other_charge: BigDecimal,
    pub e_inv_ref_no: String,
    pub self_bill: bool,
    #[serde(rename = "MSICCode")]
    pub msic_code: String,
}

/// AR credit/debit note (`api/arcndn/create`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArNotePayload {
    #[serde(flatten)]
    pub header: NoteHeader,
    #[serde(rename = "arcndnpart")]
    pub parts: Vec<NotePart>,
}

/// AP credit/debit note (`api/apcndn/create`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApNotePayload {
    #[serde(flatten)]
    pub header: NoteHeader,
    #[serde(rename = "apcndnpart")]
    pub parts: Vec<NotePart>,
}

/// Any document the gateway accepts, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentPayload {
    Sales(SalesInvoicePayload),
    Purchase(PurchaseInvoicePayload),
    ArNote(ArNotePayload),
    ApNote(ApNotePayload),
}

impl DocumentPayload {
    pub fn ref_no(&self) -> &str {
        match self {
            Self::Sales(p) => &p.header.ref_no,
            Self::Purchase(p) => &p.header.ref_no,
            Self::ArNote(p) => &p.header.ref_no,
            Self::ApNote(p) => &p.header.ref_no,
        }
    }

    /// Number of line items carried by the payload.
    pub fn line_count(&self) -> usize {
        match self {
            Self::Sales(p) => p.header.parts.len(),
            Self::Purchase(p) => p.header.parts.len(),
            Self::ArNote(p) => p.parts.len(),
            Self::ApNote(p) => p.parts.len(),
        }
    }
}
