//! Staging-to-gateway synchronization

pub mod grouping;
pub mod mapping;
pub mod ports;
pub mod reconciliation;
pub mod submission;

pub use grouping::group_rows;
pub use mapping::map_document;
pub use reconciliation::ReconciliationService;
pub use submission::SubmissionService;
