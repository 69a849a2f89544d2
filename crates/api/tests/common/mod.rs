//! Shared helpers for HTTP integration tests.
//!
//! The app is built with [`build_app_router`] over the in-memory store, so
//! tests exercise the production middleware stack without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use epic_api::auth::jwt::{generate_access_token, JwtConfig};
use epic_api::auth::password::hash_password;
use epic_api::config::ServerConfig;
use epic_api::router::build_app_router;
use epic_api::state::AppState;
use epic_core::activity::RecordingSink;
use epic_core::identity::{NewUser, User};
use epic_core::memory::MemoryStore;
use epic_core::roles::Role;
use epic_core::store::CrmStore;
use epic_core::types::DbId;
use epic_core::workflow::WorkflowConfig;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Plaintext password of users created with [`TestApp::user_with_password`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        workflow: WorkflowConfig::default(),
        bootstrap_admin: None,
    }
}

/// Router plus handles on the backing store and activity sink.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub config: ServerConfig,
}

/// A seeded user and a bearer token for it.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> DbId {
        self.user.id
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(store.clone(), sink.clone(), config.clone());
    let router = build_app_router(state, &config);
    TestApp {
        router,
        store,
        sink,
        config,
    }
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Seed a user without a usable password and mint a token directly.
    pub async fn user(&self, username: &str, role: Option<Role>) -> TestUser {
        self.seed(username, role, false, "unused-hash".to_string())
            .await
    }

    pub async fn staff(&self, username: &str) -> TestUser {
        self.seed(username, None, true, "unused-hash".to_string())
            .await
    }

    /// Seed a user whose password is [`TEST_PASSWORD`], for login tests.
    pub async fn user_with_password(&self, username: &str, role: Option<Role>) -> TestUser {
        let hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
        self.seed(username, role, false, hash).await
    }

    async fn seed(
        &self,
        username: &str,
        role: Option<Role>,
        is_staff: bool,
        password_hash: String,
    ) -> TestUser {
        let user = self
            .store
            .create_user(&NewUser {
                username: username.to_string(),
                email: format!("{username}@test.com"),
                password_hash,
                role,
                is_staff,
            })
            .await
            .expect("user creation should succeed");
        let token =
            generate_access_token(&user, &self.config.jwt).expect("token generation should succeed");
        TestUser { user, token }
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PATCH with no body, for the status endpoints.
pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
