//! # E-Invoice Domain
//!
//! Business domain types for the e-invoice bridge.
//!
//! This crate contains:
//! - Document categories and staging state codes
//! - Typed staging rows and the documents grouped from them
//! - Gateway payloads, submission results and status records
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other bridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
