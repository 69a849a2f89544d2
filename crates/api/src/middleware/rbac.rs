//! Role-based access control extractors.
//!
//! Entity-level decisions live in `epic_core::policy`; these extractors only
//! gate whole endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use epic_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a staff account or the Management role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn managers_only(RequireManagement(user): RequireManagement) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManagement(pub AuthUser);

impl FromRequestParts<AppState> for RequireManagement {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff && !user.actor().is_management() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Management role required".into(),
            )));
        }
        Ok(RequireManagement(user))
    }
}
