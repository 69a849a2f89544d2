//! Response helpers for write endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use epic_core::workflow::{Applied, WriteStatus};
use serde::Serialize;

/// Renders an [`Applied`] write: `201` with the entity when created, `200`
/// with the entity when updated, `204` with no body when deleted.
pub struct WriteResponse<T>(pub Applied<T>);

impl<T: Serialize> IntoResponse for WriteResponse<T> {
    fn into_response(self) -> Response {
        let Applied { status, value } = self.0;
        match status {
            WriteStatus::Created => (StatusCode::CREATED, Json(value)).into_response(),
            WriteStatus::Updated => (StatusCode::OK, Json(value)).into_response(),
            WriteStatus::Deleted => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
