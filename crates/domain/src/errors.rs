//! Error types used throughout the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the e-invoice bridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EInvoiceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EInvoiceError {
    /// Build an `InvalidInput` error naming the offending staging column.
    pub fn column(column: &str, detail: impl std::fmt::Display) -> Self {
        Self::InvalidInput(format!("column '{column}': {detail}"))
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, EInvoiceError>;
