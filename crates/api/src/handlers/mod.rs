pub mod admin;
pub mod auth;
pub mod clients;
pub mod contracts;
pub mod events;
pub mod search;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parse a JSON request body.
///
/// Write handlers take the body as `Bytes` and call this once the target
/// resource has been resolved, so a missing parent answers 404 and a
/// malformed body answers 400 in the usual error shape.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Parse an optional JSON body: an empty body yields `T::default()`.
///
/// Used by the status endpoints (`activate`, `sign`) whose body only
/// overrides a default target status.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_json(body)
}
