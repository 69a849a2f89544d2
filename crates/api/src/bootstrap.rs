//! First staff account.
//!
//! A fresh database has no users, and `/admin/users` needs a staff or
//! Management caller. When `ADMIN_USERNAME` is configured the binary creates
//! that account on startup; an existing account is left untouched.

use epic_core::error::CoreError;
use epic_core::identity::{NewUser, User};
use epic_core::roles::Role;
use epic_core::store::CrmStore;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;

/// Create the bootstrap admin unless a user with that name exists.
///
/// Returns the created user, or `None` when nothing was written.
pub async fn ensure_admin(
    store: &dyn CrmStore,
    admin: &BootstrapAdmin,
) -> Result<Option<User>, CoreError> {
    if store.find_credentials(&admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Bootstrap admin already exists");
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

    let user = store
        .create_user(&NewUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Some(Role::Management),
            is_staff: true,
        })
        .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}
