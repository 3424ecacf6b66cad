//! Staging store implementation

pub mod manager;
mod rows;
pub mod staging_store;

pub use manager::{StagingConnection, StagingDb};
pub use staging_store::SqliteStagingStore;
