//! Authenticated gateway API client
//!
//! Submissions never fail with an error value. Authentication problems,
//! rejected requests and transport faults all come back as a failed
//! [`SubmissionResult`] carrying a message fit for the staging status column.

use std::sync::Arc;

use einvoice_domain::constants::STATUS_ENDPOINT;
use einvoice_domain::{EInvoiceError, Result, StatusRecord, SubmissionResult};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::endpoint_url;
use super::token::AccessTokenProvider;
use super::validation::render_failure;
use super::wire::{StatusRequest, StatusResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Sends bearer-authenticated requests to a gateway environment.
pub struct ApiClient {
    http: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl ApiClient {
    pub fn new(http: HttpClient, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { http, tokens }
    }

    /// POST `payload` as JSON to `endpoint` of `environment`.
    ///
    /// On 2xx the raw response body is returned as the message.
    #[instrument(skip(self, payload))]
    pub async fn submit<T>(&self, endpoint: &str, payload: &T, environment: &str) -> SubmissionResult
    where
        T: Serialize + ?Sized + Sync,
    {
        let token = match self.tokens.access_token(environment).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "No access token; submission not sent");
                return SubmissionResult::failed(format!(
                    "AuthenticationFailed: unable to acquire token for {environment}"
                ));
            }
        };

        let url = match endpoint_url(environment, endpoint) {
            Ok(url) => url,
            Err(err) => return SubmissionResult::failed(format!("Internal Error: {err}")),
        };

        let request = self.http.request(Method::POST, url).bearer_auth(token).json(payload);
        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Submission request failed in transit");
                return SubmissionResult::failed(format!("Internal Error: {err}"));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                let err = EInvoiceError::from(InfraError::from(err));
                return SubmissionResult::failed(format!("Internal Error: {err}"));
            }
        };

        if status.is_success() {
            debug!(status = status.as_u16(), "Submission accepted");
            SubmissionResult::succeeded(body)
        } else {
            debug!(status = status.as_u16(), "Submission rejected");
            SubmissionResult::failed(render_failure(status.as_u16(), &body))
        }
    }

    /// Current validation state of `ref_nos`, one batched request.
    ///
    /// # Errors
    /// Returns `Auth` without a token, `Network` on transport faults, a
    /// status-derived error on non-2xx and `InvalidInput` on an unreadable
    /// body.
    #[instrument(skip(self, ref_nos), fields(references = ref_nos.len()))]
    pub async fn query_status(
        &self,
        environment: &str,
        doc_type: &str,
        ref_nos: &[String],
    ) -> Result<Vec<StatusRecord>> {
        let token = self.tokens.access_token(environment).await?;
        let url = endpoint_url(environment, STATUS_ENDPOINT)?;

        let request = self
            .http
            .request(Method::POST, url)
            .bearer_auth(token)
            .json(&StatusRequest { doc_type, ref_nos });
        let response = self.http.send(request).await?;

        let status = response.status();
        let body = response.text().await.map_err(|err| EInvoiceError::from(InfraError::from(err)))?;

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: StatusResponse =
            serde_json::from_str(&body).map_err(|err| EInvoiceError::from(InfraError::from(err)))?;
        let records: Vec<StatusRecord> =
            parsed.data.unwrap_or_default().into_iter().map(StatusRecord::from).collect();

        debug!(records = records.len(), "Status query answered");
        Ok(records)
    }
}

fn map_status_error(status: StatusCode, body: &str) -> EInvoiceError {
    let message = format!("status query returned HTTP {}: {}", status.as_u16(), body);
    match status.as_u16() {
        401 | 403 => EInvoiceError::Auth(message),
        404 => EInvoiceError::NotFound(message),
        400..=499 => EInvoiceError::InvalidInput(message),
        _ => EInvoiceError::Network(message),
    }
}
