//! Background scheduling
//!
//! The polling orchestrator follows the usual runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout on join

pub mod error;
pub mod polling;

pub use error::{SchedulerError, SchedulerResult};
pub use polling::{PollingOrchestrator, PollingOrchestratorConfig};
