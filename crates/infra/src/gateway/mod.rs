//! E-invoicing gateway adapter
//!
//! [`TokenManager`] caches bearer tokens per environment, [`ApiClient`] sends
//! authenticated requests, and [`GatewayClient`] binds both to one environment
//! as the [`einvoice_core::EInvoiceGateway`] port.

pub mod client;
pub mod gateway_client;
pub mod token;
pub mod validation;
pub mod wire;

use einvoice_domain::{EInvoiceError, Result};
use url::Url;

pub use client::ApiClient;
pub use gateway_client::GatewayClient;
pub use token::{AccessTokenProvider, Credentials, TokenManager};
pub use validation::{render_failure, ValidationEnvelope};

/// Absolute URL of `path` under the environment base URL.
pub(crate) fn endpoint_url(environment: &str, path: &str) -> Result<Url> {
    let raw = format!("{}/{}", environment.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|err| {
        EInvoiceError::InvalidInput(format!("invalid gateway URL '{raw}': {err}"))
    })
}
