//! Conversions from external infrastructure errors into domain errors.

use einvoice_domain::EInvoiceError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EInvoiceError);

impl From<InfraError> for EInvoiceError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EInvoiceError> for InfraError {
    fn from(value: EInvoiceError) -> Self {
        InfraError(value)
    }
}

trait IntoEInvoiceError {
    fn into_einvoice(self) -> EInvoiceError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → EInvoiceError */
/* -------------------------------------------------------------------------- */

impl IntoEInvoiceError for SqlError {
    fn into_einvoice(self) -> EInvoiceError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        EInvoiceError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        EInvoiceError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        EInvoiceError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        EInvoiceError::Database("foreign key constraint violation".into())
                    }
                    _ => EInvoiceError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => EInvoiceError::NotFound("no rows returned by query".into()),
            RE::InvalidColumnName(name) => EInvoiceError::column(&name, "column is missing"),
            RE::InvalidColumnType(_, name, ty) => {
                EInvoiceError::column(&name, format!("unexpected {ty} value"))
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                EInvoiceError::InvalidInput(format!("failed to convert sqlite value: {cause}"))
            }
            RE::Utf8Error(_) => {
                EInvoiceError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => EInvoiceError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => EInvoiceError::Database("invalid SQL query".into()),
            other => EInvoiceError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_einvoice())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → EInvoiceError */
/* -------------------------------------------------------------------------- */

impl IntoEInvoiceError for r2d2::Error {
    fn into_einvoice(self) -> EInvoiceError {
        EInvoiceError::Database(format!("staging connection pool: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_einvoice())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EInvoiceError */
/* -------------------------------------------------------------------------- */

impl IntoEInvoiceError for HttpError {
    fn into_einvoice(self) -> EInvoiceError {
        if self.is_timeout() {
            return EInvoiceError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EInvoiceError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return EInvoiceError::Network(format!("malformed HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => EInvoiceError::Auth(message),
                404 => EInvoiceError::NotFound(message),
                400..=499 => EInvoiceError::InvalidInput(message),
                _ => EInvoiceError::Network(message),
            };
        }

        EInvoiceError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_einvoice())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / join errors → EInvoiceError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(EInvoiceError::InvalidInput(format!("invalid JSON: {value}")))
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        let err = if value.is_cancelled() {
            EInvoiceError::Internal("blocking task cancelled".into())
        } else {
            EInvoiceError::Internal(format!("blocking task panic: {value}"))
        };
        InfraError(err)
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
