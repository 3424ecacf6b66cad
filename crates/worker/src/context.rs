//! Worker context - dependency wiring

use std::sync::Arc;

use einvoice_core::{ReconciliationService, SubmissionService, SystemClock};
use einvoice_domain::{Config, Result};
use einvoice_infra::gateway::{ApiClient, GatewayClient, TokenManager};
use einvoice_infra::{
    HttpClient, PollingOrchestrator, PollingOrchestratorConfig, SqliteStagingStore, StagingDb,
};
use tracing::info;

/// Everything the polling loop needs, built once at startup.
pub struct WorkerContext {
    pub db: Arc<StagingDb>,
    pub orchestrator: PollingOrchestrator,
}

impl WorkerContext {
    /// Build the staging store, gateway client and services from `config`.
    ///
    /// # Errors
    /// Fails when the staging pool cannot be opened, the schema cannot be
    /// created, or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(StagingDb::from_config(&config.staging)?);
        if config.staging.create_schema {
            db.create_schema()?;
            info!(path = %db.path().display(), "Staging schema ensured");
        }
        db.health_check()?;

        let clock = Arc::new(SystemClock);
        let http = HttpClient::builder().timeout(config.gateway.timeout()).build()?;
        let tokens = Arc::new(TokenManager::from_config(http.clone(), &config.gateway, clock.clone()));
        let api = Arc::new(ApiClient::new(http, tokens));
        let gateway = Arc::new(GatewayClient::new(api, config.gateway.base_url.clone()));

        let store = Arc::new(SqliteStagingStore::new(Arc::clone(&db)));
        let submission = Arc::new(
            SubmissionService::new(store.clone(), gateway.clone(), clock)
                .with_message_limit(config.worker.status_message_limit),
        );
        let reconciliation = Arc::new(ReconciliationService::new(store, gateway));

        let orchestrator = PollingOrchestrator::new(
            submission,
            reconciliation,
            PollingOrchestratorConfig::from(&config.worker),
        );

        info!(
            environment = %config.gateway.normalized_base_url(),
            staging = %config.staging.path,
            interval_secs = config.worker.polling_interval().as_secs(),
            "Worker context initialized"
        );

        Ok(Self { db, orchestrator })
    }
}
