//! # E-Invoice Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The e-invoicing gateway adapter (token cache, API client)
//! - The SQLite staging store
//! - Configuration loading
//! - The polling orchestrator
//!
//! ## Architecture
//! - Implements traits defined in `einvoice-core`
//! - Contains all "impure" code (I/O, HTTP, SQL)

pub mod config;
pub mod database;
pub mod errors;
pub mod gateway;
pub mod http;
pub mod scheduling;

// Re-export commonly used items
pub use database::{SqliteStagingStore, StagingDb};
pub use errors::InfraError;
pub use gateway::{ApiClient, GatewayClient, TokenManager};
pub use http::HttpClient;
pub use scheduling::{PollingOrchestrator, PollingOrchestratorConfig};
