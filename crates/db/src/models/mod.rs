//! Row types for the CRM tables.
//!
//! Each row mirrors its table one-to-one and converts into the matching
//! `epic_core` entity. Status and role columns are stored as text and parsed
//! on the way out.

pub mod client;
pub mod contract;
pub mod event;
pub mod user;

use std::str::FromStr;

/// Parse a text column into a domain enum, reporting the column on failure.
pub(crate) fn decode_column<T>(column: &str, value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|msg: String| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: msg.into(),
    })
}
