use epic_core::workflow::WorkflowConfig;

use crate::auth::jwt::JwtConfig;

/// Log filter used when `RUST_LOG` is unset. `epic::activity` is the target
/// of the activity log written by `epic-events`.
pub const DEFAULT_LOG_FILTER: &str =
    "epic_api=debug,epic_core=debug,epic_db=info,epic::activity=info,tower_http=debug";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Lifecycle switches passed to the workflow.
    pub workflow: WorkflowConfig,
    /// Staff account created at startup when it does not exist yet.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials of the first staff account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `SIGN_AUTO_ACTIVATES_CLIENT` | `false`                 |
    /// | `ADMIN_USERNAME`             | unset (no bootstrap)    |
    /// | `ADMIN_EMAIL`                | `<username>@localhost`  |
    /// | `ADMIN_PASSWORD`             | required with username  |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let auto_activate_client_on_sign: bool = std::env::var("SIGN_AUTO_ACTIVATES_CLIENT")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SIGN_AUTO_ACTIVATES_CLIENT must be true or false");

        let bootstrap_admin = std::env::var("ADMIN_USERNAME")
            .ok()
            .filter(|u| !u.is_empty())
            .map(|username| BootstrapAdmin {
                email: std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost")),
                password: std::env::var("ADMIN_PASSWORD")
                    .expect("ADMIN_PASSWORD must be set when ADMIN_USERNAME is"),
                username,
            });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            workflow: WorkflowConfig {
                auto_activate_client_on_sign,
            },
            bootstrap_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    use super::*;

    #[test]
    fn test_default_log_filter_covers_every_crate_and_activity_log() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        let targets: Vec<&str> = DEFAULT_LOG_FILTER
            .split(',')
            .filter_map(|d| d.split('=').next())
            .collect();
        for target in ["epic_api", "epic_core", "epic_db", "epic::activity", "tower_http"] {
            assert!(targets.contains(&target), "missing {target}");
        }
    }
}
