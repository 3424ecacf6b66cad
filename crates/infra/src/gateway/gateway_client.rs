//! Gateway port adapter
//!
//! Binds an [`ApiClient`] to one environment and words the status message
//! stored for a successful submission.

use std::sync::Arc;

use async_trait::async_trait;
use einvoice_core::EInvoiceGateway;
use einvoice_domain::constants::NO_SPECIFIC_MESSAGE;
use einvoice_domain::{
    DocumentCategory, DocumentPayload, Result, StatusDocType, StatusRecord, SubmissionResult,
};

use super::client::ApiClient;
use super::wire::SuccessEnvelope;

/// [`EInvoiceGateway`] bound to one gateway environment.
pub struct GatewayClient {
    api: Arc<ApiClient>,
    environment: String,
}

impl GatewayClient {
    pub fn new(api: Arc<ApiClient>, environment: impl Into<String>) -> Self {
        Self { api, environment: environment.into().trim_end_matches('/').to_string() }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

#[async_trait]
impl EInvoiceGateway for GatewayClient {
    async fn submit(
        &self,
        category: DocumentCategory,
        payload: &DocumentPayload,
    ) -> SubmissionResult {
        let result = self.api.submit(category.endpoint(), payload, &self.environment).await;
        if !result.success {
            return result;
        }

        let api_message = SuccessEnvelope::message_from(&result.message)
            .unwrap_or_else(|| NO_SPECIFIC_MESSAGE.to_string());
        SubmissionResult::succeeded(format!(
            "{} RefNo {} created successfully. API Message: {}",
            category.label(),
            payload.ref_no(),
            api_message
        ))
    }

    async fn query_status(
        &self,
        doc_type: StatusDocType,
        ref_nos: &[String],
    ) -> Result<Vec<StatusRecord>> {
        self.api.query_status(&self.environment, doc_type.code(), ref_nos).await
    }
}
