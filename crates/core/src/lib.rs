//! # E-Invoice Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the staging store and the e-invoicing gateway
//! - Grouping of staging rows into documents and payload mapping
//! - The per-category submission pass and the reconciliation pass
//!
//! ## Architecture Principles
//! - Only depends on `einvoice-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod sync;
pub mod time;
pub mod utils;

pub use sync::ports::{EInvoiceGateway, StagingStore};
pub use sync::{group_rows, map_document, ReconciliationService, SubmissionService};
pub use time::{Clock, MockClock, SystemClock};
pub use utils::text::truncate_chars;
