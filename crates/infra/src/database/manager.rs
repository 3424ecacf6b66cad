//! Staging database connection pool

use std::path::{Path, PathBuf};
use std::time::Duration;

use einvoice_domain::{EInvoiceError, Result, StagingConfig};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Pooled connection to the staging store.
pub type StagingConnection = PooledConnection<SqliteConnectionManager>;

/// r2d2 pool over the staging SQLite database.
///
/// Connections are checked out per call and returned immediately; nothing
/// holds a connection across a polling cycle.
pub struct StagingDb {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl StagingDb {
    /// Open a pool of at most `pool_size` connections.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(Duration::from_secs(10))
            .build(manager)
            .map_err(map_pool_error)?;

        info!(db_path = %path.display(), max_connections = pool.max_size(), "staging pool initialised");

        Ok(Self { pool, path })
    }

    /// Open the pool described by the staging configuration.
    pub fn from_config(config: &StagingConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<StagingConnection> {
        self.pool.get().map_err(map_pool_error)
    }

    /// Create the bundled staging schema if it does not exist.
    pub fn create_schema(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the database is reachable.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

fn map_sql_error(err: rusqlite::Error) -> EInvoiceError {
    EInvoiceError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> EInvoiceError {
    EInvoiceError::from(InfraError::from(err))
}
