//! Document categories and staging state codes
//!
//! Every staged document belongs to exactly one [`DocumentCategory`]. The
//! category decides the staging table it is read from, the gateway endpoint
//! it is submitted to, and the status document type it is reconciled under.

use serde::{Deserialize, Serialize};

use crate::constants::{
    AP_NOTE_ENDPOINT, AR_NOTE_ENDPOINT, PURCHASE_INVOICE_ENDPOINT, SALES_INVOICE_ENDPOINT,
};
use crate::impl_status_code_conversions;

/// The five document kinds moved from staging to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentCategory {
    SalesInvoice,
    DownPaymentInvoice,
    PurchaseInvoice,
    ArCreditDebitNote,
    ApCreditDebitNote,
}

impl DocumentCategory {
    /// Processing order of a polling cycle.
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::SalesInvoice,
        DocumentCategory::DownPaymentInvoice,
        DocumentCategory::PurchaseInvoice,
        DocumentCategory::ArCreditDebitNote,
        DocumentCategory::ApCreditDebitNote,
    ];

    /// Staging table holding pending rows for this category.
    pub const fn staging_table(self) -> &'static str {
        match self {
            Self::SalesInvoice => "EINV",
            Self::DownPaymentInvoice => "EDPI",
            Self::PurchaseInvoice => "EPCH",
            Self::ArCreditDebitNote => "ERIN",
            Self::ApCreditDebitNote => "ERPC",
        }
    }

    /// Gateway create endpoint, relative to the environment base URL.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::SalesInvoice | Self::DownPaymentInvoice => SALES_INVOICE_ENDPOINT,
            Self::PurchaseInvoice => PURCHASE_INVOICE_ENDPOINT,
            Self::ArCreditDebitNote => AR_NOTE_ENDPOINT,
            Self::ApCreditDebitNote => AP_NOTE_ENDPOINT,
        }
    }

    /// Status document type used when reconciling this category.
    pub const fn status_doc_type(self) -> StatusDocType {
        match self {
            Self::SalesInvoice | Self::DownPaymentInvoice => StatusDocType::SInvoice,
            Self::PurchaseInvoice => StatusDocType::PInvoice,
            Self::ArCreditDebitNote => StatusDocType::ArCnDn,
            Self::ApCreditDebitNote => StatusDocType::ApCnDn,
        }
    }

    /// Label used in the success message returned by the gateway client.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SalesInvoice | Self::DownPaymentInvoice => "Sales Invoice",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::ArCreditDebitNote => "ARCM",
            Self::ApCreditDebitNote => "APCM",
        }
    }

    /// Short name for log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalesInvoice => "sales_invoice",
            Self::DownPaymentInvoice => "down_payment_invoice",
            Self::PurchaseInvoice => "purchase_invoice",
            Self::ArCreditDebitNote => "ar_credit_debit_note",
            Self::ApCreditDebitNote => "ap_credit_debit_note",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document type understood by the gateway status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusDocType {
    #[serde(rename = "SInvoice")]
    SInvoice,
    #[serde(rename = "PInvoice")]
    PInvoice,
    #[serde(rename = "ARCNDN")]
    ArCnDn,
    #[serde(rename = "APCNDN")]
    ApCnDn,
}

impl StatusDocType {
    /// Reconciliation order.
    pub const TRACKED: [StatusDocType; 4] =
        [StatusDocType::SInvoice, StatusDocType::PInvoice, StatusDocType::ArCnDn, StatusDocType::ApCnDn];
}

impl_status_code_conversions!(StatusDocType {
    SInvoice => "SInvoice",
    PInvoice => "PInvoice",
    ArCnDn => "ARCNDN",
    ApCnDn => "APCNDN",
});

/// Processing state of a staging record (`isCaptured` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StagingStatus {
    /// Waiting to be submitted.
    Staged,
    /// Accepted by the gateway, awaiting validation.
    Captured,
    /// Rejected by the gateway or failed in transit.
    Errored,
    /// Validated and propagated back to the ERP record.
    Finalized,
}

impl_status_code_conversions!(StagingStatus {
    Staged => "N",
    Captured => "Y",
    Errored => "E",
    Finalized => "U",
});

impl StagingStatus {
    /// Timestamp column stamped when a record moves into this state.
    pub const fn timestamp_column(self) -> &'static str {
        match self {
            Self::Finalized => "CAPTURED_DATE",
            Self::Staged | Self::Captured | Self::Errored => "UPDATE_DATE",
        }
    }
}
