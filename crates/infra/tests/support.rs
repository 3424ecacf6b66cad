use std::sync::{Arc, Once};
use std::time::Duration;

use einvoice_core::{Clock, MockClock, ReconciliationService, SubmissionService};
use einvoice_infra::database::{SqliteStagingStore, StagingDb};
use einvoice_infra::gateway::{ApiClient, Credentials, GatewayClient, TokenManager};
use einvoice_infra::http::HttpClient;
use rusqlite::params;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_USERNAME: &str = "svc-bridge";
pub const TEST_PASSWORD: &str = "hunter2";

/// Install a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Temporary staging database that keeps the underlying file alive for the
/// duration of a test.
pub struct TestStagingDb {
    pub db: Arc<StagingDb>,
    _temp_dir: TempDir,
}

impl TestStagingDb {
    /// Fresh database with the bundled schema.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db = StagingDb::new(temp_dir.path().join("staging.db"), 2)
            .expect("staging pool should be created");
        db.create_schema().expect("schema should be created");
        Self { db: Arc::new(db), _temp_dir: temp_dir }
    }

    pub fn store(&self) -> Arc<SqliteStagingStore> {
        Arc::new(SqliteStagingStore::new(Arc::clone(&self.db)))
    }

    pub fn execute_batch(&self, sql: &str) {
        let conn = self.db.get_connection().expect("connection should be available");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Insert a staging document with `lines` line items.
    pub fn seed_document(&self, doc: &SeedDocument<'_>, lines: usize) {
        let conn = self.db.get_connection().expect("connection should be available");
        conn.execute(
            "INSERT INTO staging_document (
                staging_table, doc_entry, ref_no, doc_type, erp_table, inv_date, post_date,
                header_amount, party_name, tin, brn, currency, currency_rate, created_by,
                msic_code, note_type, is_captured
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, '2025-03-02', '150.00', 'Acme Sdn Bhd',
                      'C1234567890', '201901000001', 'MYR', '1.00', 'manager', ?7, ?8, ?9)",
            params![
                doc.staging_table,
                doc.doc_entry,
                doc.ref_no,
                doc.doc_type,
                doc.erp_table,
                doc.inv_date,
                doc.msic_code,
                doc.note_type,
                doc.is_captured
            ],
        )
        .expect("staging document should be inserted");

        for line_num in 0..lines {
            conn.execute(
                "INSERT INTO staging_line (
                    staging_table, doc_entry, line_num, uom, quantity, unit_price, amount,
                    description, classification, tax_rate, tax_amount
                ) VALUES (?1, ?2, ?3, 'EA', '2', '37.50', '75.00', ?4, '022', '6', '4.50')",
                params![
                    doc.staging_table,
                    doc.doc_entry,
                    line_num as i64,
                    format!("{} line {}", doc.ref_no, line_num)
                ],
            )
            .expect("staging line should be inserted");
        }
    }

    pub fn seed_erp_document(&self, erp_table: &str, doc_entry: i64) {
        let conn = self.db.get_connection().expect("connection should be available");
        conn.execute(
            "INSERT INTO erp_document (erp_table, doc_entry) VALUES (?1, ?2)",
            params![erp_table, doc_entry],
        )
        .expect("ERP document should be inserted");
    }

    pub fn staging_state(&self, staging_table: &str, doc_entry: i64) -> StagingState {
        let conn = self.db.get_connection().expect("connection should be available");
        conn.query_row(
            "SELECT is_captured, status_msg, update_date, captured_date
               FROM staging_document WHERE staging_table = ?1 AND doc_entry = ?2",
            params![staging_table, doc_entry],
            |row| {
                Ok(StagingState {
                    is_captured: row.get(0)?,
                    status_msg: row.get(1)?,
                    update_date: row.get(2)?,
                    captured_date: row.get(3)?,
                })
            },
        )
        .expect("staging record should exist")
    }

    /// `(authority id, validation date, validation link)` of an ERP record.
    pub fn erp_fields(&self, erp_table: &str, doc_entry: i64) -> (String, String, String) {
        let conn = self.db.get_connection().expect("connection should be available");
        conn.query_row(
            "SELECT einv_irbm_no, einv_val_date, einv_val_link
               FROM erp_document WHERE erp_table = ?1 AND doc_entry = ?2",
            params![erp_table, doc_entry],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("ERP record should exist")
    }
}

impl Default for TestStagingDb {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingState {
    pub is_captured: String,
    pub status_msg: String,
    pub update_date: Option<String>,
    pub captured_date: Option<String>,
}

/// Staging document seed with sales-invoice defaults.
#[derive(Debug, Clone)]
pub struct SeedDocument<'a> {
    pub staging_table: &'a str,
    pub doc_entry: i64,
    pub ref_no: &'a str,
    pub doc_type: &'a str,
    pub erp_table: &'a str,
    pub inv_date: &'a str,
    pub msic_code: Option<&'a str>,
    pub note_type: Option<&'a str>,
    pub is_captured: &'a str,
}

impl<'a> SeedDocument<'a> {
    pub fn sales(doc_entry: i64, ref_no: &'a str) -> Self {
        Self {
            staging_table: "EINV",
            doc_entry,
            ref_no,
            doc_type: "SInvoice",
            erp_table: "OINV",
            inv_date: "2025-03-01",
            msic_code: None,
            note_type: None,
            is_captured: "N",
        }
    }

    pub fn captured(mut self) -> Self {
        self.is_captured = "Y";
        self
    }
}

/// Mount a token endpoint answering with `token`.
pub async fn mount_token(server: &MockServer, token: &str, expires_in: u64) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token,
            "expires_in": expires_in,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

pub fn http_client() -> HttpClient {
    HttpClient::builder().timeout(Duration::from_secs(5)).build().expect("http client")
}

pub fn token_manager(clock: Arc<dyn Clock>) -> Arc<TokenManager> {
    Arc::new(TokenManager::new(
        http_client(),
        Credentials::new(TEST_USERNAME, TEST_PASSWORD),
        clock,
    ))
}

/// Gateway client for the mock server, backed by a real token manager.
pub fn gateway_for(server: &MockServer) -> Arc<GatewayClient> {
    let tokens = token_manager(Arc::new(MockClock::default()));
    let api = Arc::new(ApiClient::new(http_client(), tokens));
    Arc::new(GatewayClient::new(api, server.uri()))
}

/// Submission and reconciliation services over a staging db and a gateway.
pub fn services(
    staging: &TestStagingDb,
    gateway: Arc<GatewayClient>,
) -> (Arc<SubmissionService>, Arc<ReconciliationService>) {
    let store = staging.store();
    let submission = Arc::new(SubmissionService::new(
        store.clone(),
        gateway.clone(),
        Arc::new(MockClock::default()),
    ));
    let reconciliation = Arc::new(ReconciliationService::new(store, gateway));
    (submission, reconciliation)
}
