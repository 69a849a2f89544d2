//! Identity & role directory types.

use serde::Serialize;

use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// A staff member as known to the directory.
///
/// Never carries the password hash; see [`UserCredentials`] for login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
    pub is_staff: bool,
    pub created_at: Timestamp,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// The principal this user acts as once authenticated.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
            is_staff: self.is_staff,
        }
    }
}

/// A user row together with its stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Input for registering a new user in the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<Role>,
    pub is_staff: bool,
}

/// The authenticated principal behind a request.
///
/// Role and staff flag are fixed for the lifetime of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Option<Role>,
    pub is_staff: bool,
}

impl Actor {
    pub fn is(&self, user_id: DbId) -> bool {
        self.user_id == user_id
    }

    pub fn is_management(&self) -> bool {
        self.role == Some(Role::Management)
    }
}
