//! Staff roles.
//!
//! The role names must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_MANAGEMENT: &str = "Management";
pub const ROLE_SALES: &str = "Sales";
pub const ROLE_SUPPORT: &str = "Support";

/// The single role a staff member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Management,
    Sales,
    Support,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Management => ROLE_MANAGEMENT,
            Role::Sales => ROLE_SALES,
            Role::Support => ROLE_SUPPORT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_MANAGEMENT => Ok(Role::Management),
            ROLE_SALES => Ok(Role::Sales),
            ROLE_SUPPORT => Ok(Role::Support),
            other => Err(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_MANAGEMENT}, {ROLE_SALES}, {ROLE_SUPPORT}"
            )),
        }
    }
}
