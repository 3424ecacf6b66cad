//! Bridge constants
//!
//! Centralized location for gateway paths, staging codes and defaults.

// Configuration defaults
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_REFRESH_MARGIN_SECS: u64 = 10;
pub const DEFAULT_STAGING_POOL_SIZE: u32 = 4;
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 90;
pub const DEFAULT_STATUS_MESSAGE_LIMIT: usize = 300;

// Gateway endpoints (relative to the environment base URL)
pub const TOKEN_ENDPOINT: &str = "connect/token";
pub const STATUS_ENDPOINT: &str = "api/einvoicestatus";
pub const SALES_INVOICE_ENDPOINT: &str = "api/salesinvoice/create";
pub const PURCHASE_INVOICE_ENDPOINT: &str = "api/purchaseinvoice/create";
pub const AR_NOTE_ENDPOINT: &str = "api/arcndn/create";
pub const AP_NOTE_ENDPOINT: &str = "api/apcndn/create";
pub const PASSWORD_GRANT_TYPE: &str = "password";

// Payload constants
pub const BNP_TYPE_BRN: &str = "BRN";
pub const LINE_TAX_TYPE: &str = "06";

// Gateway status values
pub const VALIDATED_STATUS: &str = "Validated";
pub const NO_SPECIFIC_MESSAGE: &str = "No specific message.";
