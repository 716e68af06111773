//! Conversions from external infrastructure errors into domain errors.

use fanevent_common::storage::StorageError;
use fanevent_domain::FanEventError;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FanEventError);

impl From<InfraError> for FanEventError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FanEventError> for InfraError {
    fn from(value: FanEventError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

trait IntoFanEventError {
    fn into_fanevent(self) -> FanEventError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → FanEventError */
/* -------------------------------------------------------------------------- */

impl IntoFanEventError for SqlError {
    fn into_fanevent(self) -> FanEventError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        FanEventError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        FanEventError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        FanEventError::Conflict("record already exists".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        FanEventError::InvalidInput("referenced record does not exist".into())
                    }
                    _ => FanEventError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => FanEventError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                FanEventError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::IntegralValueOutOfRange(column, value) => FanEventError::Database(format!(
                "value {value} out of range in column {column}"
            )),
            RE::InvalidColumnType(_, _, ty) => {
                FanEventError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidQuery => FanEventError::Database("invalid SQL query".into()),
            other => FanEventError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_fanevent())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → FanEventError */
/* -------------------------------------------------------------------------- */

impl IntoFanEventError for StorageError {
    fn into_fanevent(self) -> FanEventError {
        match self {
            StorageError::Rusqlite(err) => err.into_fanevent(),
            StorageError::Timeout(secs) => {
                FanEventError::Database(format!("timed out waiting {secs}s for a connection"))
            }
            StorageError::Connection(msg) | StorageError::Query(msg) => {
                FanEventError::Database(msg)
            }
            StorageError::Migration(msg) => {
                FanEventError::Database(format!("Migration error: {msg}"))
            }
            StorageError::InvalidConfig(msg) => FanEventError::Config(msg),
            other => FanEventError::Database(format!("Storage error: {other}")),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_fanevent())
    }
}

/* -------------------------------------------------------------------------- */
/* jsonwebtoken::Error → FanEventError */
/* -------------------------------------------------------------------------- */

impl IntoFanEventError for JwtError {
    fn into_fanevent(self) -> FanEventError {
        let reason = match self.kind() {
            JwtErrorKind::ExpiredSignature => "token has expired",
            JwtErrorKind::InvalidSignature => "token signature is invalid",
            JwtErrorKind::InvalidIssuer => "token issuer is not accepted",
            JwtErrorKind::InvalidAudience => "token audience is not accepted",
            JwtErrorKind::ImmatureSignature => "token is not valid yet",
            JwtErrorKind::InvalidAlgorithm => "token algorithm is not accepted",
            JwtErrorKind::MissingRequiredClaim(_) => "token is missing a required claim",
            _ => "token is malformed",
        };
        FanEventError::Auth(reason.into())
    }
}

impl From<JwtError> for InfraError {
    fn from(value: JwtError) -> Self {
        InfraError(value.into_fanevent())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio JoinError → FanEventError */
/* -------------------------------------------------------------------------- */

impl IntoFanEventError for JoinError {
    fn into_fanevent(self) -> FanEventError {
        if self.is_cancelled() {
            FanEventError::Internal("blocking task was cancelled".into())
        } else {
            FanEventError::Internal(format!("Task join error: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_fanevent())
    }
}
