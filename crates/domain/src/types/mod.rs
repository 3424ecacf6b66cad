//! Domain types and models

pub mod category;
pub mod decimal;
pub mod gateway;
pub mod payload;
pub mod report;
pub mod staging;

pub use category::{DocumentCategory, StagingStatus, StatusDocType};
pub use gateway::{StatusRecord, SubmissionResult};
pub use payload::{
    ApNotePayload, ArNotePayload, DocumentPayload, InvoiceHeader, InvoicePart, NoteHeader,
    NotePart, PurchaseInvoicePayload, SalesInvoicePayload, ShipRecipient,
};
pub use report::{CategoryReport, CycleReport, ReconciliationReport};
pub use staging::{DocumentReference, StagedDocument, StagingHeader, StagingLine, StagingRow};
