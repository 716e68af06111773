//! Column conversions and error mapping shared by the SQLite repositories.
//!
//! Timestamps are stored as unix seconds and enums as their `as_str` text.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use fanevent_common::storage::StorageError;
use fanevent_domain::FanEventError;
use rusqlite::types::Type;
use rusqlite::Row;
use tokio::task::JoinError;

use crate::errors::InfraError;

pub(crate) fn to_ts(at: DateTime<Utc>) -> i64 {
    at.timestamp()
}

pub(crate) fn opt_ts(at: Option<DateTime<Utc>>) -> Option<i64> {
    at.map(to_ts)
}

/// Read a unix-seconds column as a UTC timestamp.
pub(crate) fn get_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

pub(crate) fn get_opt_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(idx)? {
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .map(Some)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs)),
        None => Ok(None),
    }
}

/// Read a TEXT column into one of the domain's string-backed enums.
pub(crate) fn get_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into()))
}

pub(crate) fn bool_to_int(value: bool) -> i32 {
    i32::from(value)
}

pub(crate) fn int_to_bool(value: i32) -> bool {
    value != 0
}

/// Unwrap a single-row lookup, treating "no rows" as absence.
pub(crate) fn optional<T>(result: Result<T, StorageError>) -> fanevent_domain::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
        Err(err) => Err(map_storage_error(err)),
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

pub(crate) fn map_storage_error(err: StorageError) -> FanEventError {
    FanEventError::from(InfraError::from(err))
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> FanEventError {
    FanEventError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: JoinError) -> FanEventError {
    FanEventError::from(InfraError::from(err))
}
