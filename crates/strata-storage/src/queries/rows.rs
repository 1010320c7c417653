//! Row decoding helpers shared by the query modules.

use chrono::{DateTime, Utc};
use rusqlite::types::FromSql;
use rusqlite::Row;
use serde::de::DeserializeOwned;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

/// Read a typed column.
pub fn col<T: FromSql>(row: &Row<'_>, idx: usize) -> StrataResult<T> {
    row.get(idx).map_err(|e| to_storage_err(e.to_string()))
}

/// Read an integer column as an unsigned counter.
pub fn col_u64(row: &Row<'_>, idx: usize) -> StrataResult<u64> {
    Ok(col::<i64>(row, idx)?.max(0) as u64)
}

/// Read a 0/1 column as a bool.
pub fn col_bool(row: &Row<'_>, idx: usize) -> StrataResult<bool> {
    Ok(col::<i64>(row, idx)? != 0)
}

/// Read an RFC 3339 timestamp column.
pub fn col_ts(row: &Row<'_>, idx: usize) -> StrataResult<DateTime<Utc>> {
    parse_ts(&col::<String>(row, idx)?)
}

/// Read an optional RFC 3339 timestamp column.
pub fn col_opt_ts(row: &Row<'_>, idx: usize) -> StrataResult<Option<DateTime<Utc>>> {
    col::<Option<String>>(row, idx)?
        .as_deref()
        .map(parse_ts)
        .transpose()
}

/// Read a JSON text column.
pub fn col_json<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> StrataResult<T> {
    let raw: String = col(row, idx)?;
    serde_json::from_str(&raw).map_err(|e| to_storage_err(format!("parse json column {idx}: {e}")))
}

/// Parse an RFC 3339 timestamp.
pub fn parse_ts(s: &str) -> StrataResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}

/// Serialize a value to JSON text for storage.
pub fn to_json<T: serde::Serialize>(value: &T) -> StrataResult<String> {
    serde_json::to_string(value).map_err(|e| to_storage_err(e.to_string()))
}

/// Parse an enum column through its `FromStr` impl.
pub fn col_parse<T>(row: &Row<'_>, idx: usize) -> StrataResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = col(row, idx)?;
    raw.parse::<T>()
        .map_err(|e| to_storage_err(format!("parse column {idx} '{raw}': {e}")))
}

/// `?, ?, ?` placeholder list for an `IN` clause.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Helper trait to make `query_row` return `Option` on not-found.
pub trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
