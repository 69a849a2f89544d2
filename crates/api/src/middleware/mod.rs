//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireManagement`] -- Requires staff or the Management role.

pub mod auth;
pub mod rbac;
