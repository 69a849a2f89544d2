//! Handlers for the `/admin` resource (user directory).
//!
//! All handlers require staff or Management via [`RequireManagement`].

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use epic_core::error::CoreError;
use epic_core::identity::{NewUser, User};
use epic_core::roles::Role;
use serde::Deserialize;
use validator::Validate;

use super::parse_json;
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManagement;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150, message = "username must be 1-150 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    #[serde(default)]
    pub is_staff: bool,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireManagement(_manager): RequireManagement,
) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// POST /api/v1/admin/users
///
/// Create a user with a hashed password. Only staff may create staff.
pub async fn create_user(
    State(state): State<AppState>,
    RequireManagement(manager): RequireManagement,
    body: Bytes,
) -> AppResult<(StatusCode, Json<User>)> {
    let input: CreateUserRequest = parse_json(&body)?;
    input.validate().map_err(CoreError::from)?;
    if input.is_staff && !manager.is_staff {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only staff may create staff accounts".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&NewUser {
            username: input.username,
            email: input.email,
            password_hash,
            role: input.role,
            is_staff: input.is_staff,
        })
        .await?;

    tracing::info!(user_id = user.id, created_by = manager.user_id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}
