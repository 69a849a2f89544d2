//! User row model.

use epic_core::identity::{User, UserCredentials};
use epic_core::roles::Role;
use epic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::decode_column;

/// Full user row from the `users` table.
///
/// Contains the password hash; only [`UserRow::into_credentials`] exposes it.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub is_staff: bool,
    pub created_at: Timestamp,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, sqlx::Error> {
        let role = self
            .role
            .as_deref()
            .map(|r| decode_column::<Role>("role", r))
            .transpose()?;
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
            is_staff: self.is_staff,
            created_at: self.created_at,
        })
    }

    pub fn into_credentials(self) -> Result<UserCredentials, sqlx::Error> {
        let password_hash = self.password_hash.clone();
        Ok(UserCredentials {
            user: self.into_domain()?,
            password_hash,
        })
    }
}
