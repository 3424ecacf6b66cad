//! Per-environment bearer token cache
//!
//! One cache slot exists per environment (normalized base URL). Each slot is
//! guarded by its own async mutex which is held across the grant request, so
//! concurrent callers for the same environment wait for a single refresh
//! instead of racing their own. Different environments never block each
//! other.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use einvoice_core::Clock;
use einvoice_domain::constants::{
    DEFAULT_TOKEN_REFRESH_MARGIN_SECS, PASSWORD_GRANT_TYPE, TOKEN_ENDPOINT,
};
use einvoice_domain::{EInvoiceError, GatewayConfig, Result};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::endpoint_url;
use super::wire::TokenResponse;
use crate::http::HttpClient;

/// Supplies bearer tokens for a gateway environment.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A token valid for at least the refresh margin.
    ///
    /// # Errors
    /// Returns `EInvoiceError::Auth` when no token can be acquired.
    async fn access_token(&self, environment: &str) -> Result<String>;
}

/// Service account used for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// A margin reaching past the representable range means never fresh.
    fn is_fresh(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        self.expires_at.checked_sub_signed(margin).is_some_and(|deadline| now < deadline)
    }
}

type TokenSlot = Arc<Mutex<Option<AccessToken>>>;

/// Acquires and caches gateway bearer tokens.
pub struct TokenManager {
    http: HttpClient,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    refresh_margin: chrono::Duration,
    slots: DashMap<String, TokenSlot>,
}

impl TokenManager {
    pub fn new(http: HttpClient, credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            credentials,
            clock,
            refresh_margin: chrono::Duration::seconds(DEFAULT_TOKEN_REFRESH_MARGIN_SECS as i64),
            slots: DashMap::new(),
        }
    }

    /// Build from gateway configuration.
    pub fn from_config(http: HttpClient, config: &GatewayConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(http, Credentials::new(&config.username, &config.password), clock)
            .with_refresh_margin(config.refresh_margin())
    }

    /// Treat tokens as expired this long before their actual expiry.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = chrono::Duration::from_std(margin).unwrap_or(chrono::Duration::MAX);
        self
    }

    /// Cached token for `environment`, refreshed when within the margin of
    /// expiry.
    ///
    /// A failed refresh leaves the cached entry as it was.
    ///
    /// # Errors
    /// Returns `EInvoiceError::Auth` when the grant request fails.
    pub async fn get_token(&self, environment: &str) -> Result<String> {
        let key = environment.trim_end_matches('/').to_string();
        // Clone the slot out so the map shard is not locked across the await.
        let slot: TokenSlot = Arc::clone(self.slots.entry(key.clone()).or_default().value());
        let mut cached = slot.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(self.clock.now(), self.refresh_margin) {
                debug!(environment = %key, "Using cached access token");
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token(&key).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn request_token(&self, environment: &str) -> Result<AccessToken> {
        let url = endpoint_url(environment, TOKEN_ENDPOINT).map_err(auth_error)?;
        let form = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("grant_type", PASSWORD_GRANT_TYPE),
        ];

        let response = self
            .http
            .send(self.http.request(Method::POST, url).form(&form))
            .await
            .map_err(|err| {
                warn!(error = %err, "Token request failed");
                auth_error(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Token endpoint rejected the credentials");
            return Err(EInvoiceError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|err| {
            warn!(error = %err, "Token response could not be read");
            EInvoiceError::Auth(format!("unreadable token response: {err}"))
        })?;

        if body.access_token.is_empty() {
            warn!("Token endpoint returned an empty access token");
            return Err(EInvoiceError::Auth("token endpoint returned an empty access token".into()));
        }

        let issued_at = self.clock.now();
        let lifetime = i64::try_from(body.expires_in)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        let expires_at =
            issued_at.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);

        info!(
            expires_in = body.expires_in,
            token_type = %body.token_type,
            "Acquired gateway access token"
        );

        Ok(AccessToken { value: body.access_token, expires_at })
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self, environment: &str) -> Result<String> {
        self.get_token(environment).await
    }
}

fn auth_error(err: EInvoiceError) -> EInvoiceError {
    match err {
        EInvoiceError::Auth(_) => err,
        other => EInvoiceError::Auth(other.to_string()),
    }
}
