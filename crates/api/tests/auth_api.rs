//! HTTP-level integration tests for login, bearer authentication and the
//! admin user directory.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use epic_core::roles::Role;
use serde_json::json;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_success() {
    let test = common::build_test_app();
    let sally = test.user_with_password("sally", Some(Role::Sales)).await;

    let response = login(test.app(), "sally", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    assert!(json.get("refresh_token").is_none());
    assert_eq!(json["user"]["id"], sally.id());
    assert_eq!(json["user"]["username"], "sally");
    assert_eq!(json["user"]["role"], "Sales");
    assert!(json["user"].get("password_hash").is_none());

    let token = json["access_token"].as_str().unwrap();
    let clients = get_auth(test.app(), "/api/v1/clients", token).await;
    assert_eq!(clients.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password_or_unknown_user() {
    let test = common::build_test_app();
    test.user_with_password("sally", Some(Role::Sales)).await;

    for (username, password) in [("sally", "incorrect_password"), ("nobody", TEST_PASSWORD)] {
        let response = login(test.app(), username, password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_login_missing_fields() {
    let test = common::build_test_app();

    let response = post_json(test.app(), "/api/v1/auth/login", json!({ "username": "sally" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Bearer authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let test = common::build_test_app();

    let missing = get(test.app(), "/api/v1/clients").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(test.app(), "/api/v1/clients", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(garbage).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Admin user directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_management_creates_user_who_can_log_in() {
    let test = common::build_test_app();
    let manager = test.user("manager", Some(Role::Management)).await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({
            "username": "sue",
            "email": "sue@test.com",
            "password": "support-pass-1",
            "role": "Support",
        }),
        &manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "sue");
    assert_eq!(json["role"], "Support");
    assert_eq!(json["is_staff"], false);
    assert!(json.get("password_hash").is_none());

    let login_response = login(test.app(), "sue", "support-pass-1").await;
    assert_eq!(login_response.status(), StatusCode::OK);

    let listed = body_json(get_auth(test.app(), "/api/v1/admin/users", &manager.token).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_requires_staff_or_management() {
    let test = common::build_test_app();
    let sales = test.user("sally", Some(Role::Sales)).await;
    let staff = test.staff("root").await;

    let denied = get_auth(test.app(), "/api/v1/admin/users", &sales.token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = get_auth(test.app(), "/api/v1/admin/users", &staff.token).await;
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_only_staff_create_staff() {
    let test = common::build_test_app();
    let manager = test.user("manager", Some(Role::Management)).await;
    let staff = test.staff("root").await;
    let body = json!({
        "username": "second-root",
        "email": "root2@test.com",
        "password": "long-enough-pass",
        "is_staff": true,
    });

    let denied = post_json_auth(test.app(), "/api/v1/admin/users", body.clone(), &manager.token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = post_json_auth(test.app(), "/api/v1/admin/users", body, &staff.token).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let json = body_json(created).await;
    assert_eq!(json["is_staff"], true);
    assert!(json["role"].is_null());
}

#[tokio::test]
async fn test_create_user_rejects_weak_password_and_duplicates() {
    let test = common::build_test_app();
    let manager = test.user("manager", Some(Role::Management)).await;

    let weak = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({ "username": "sam", "email": "sam@test.com", "password": "short", "role": "Sales" }),
        &manager.token,
    )
    .await;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);

    let duplicate = post_json_auth(
        test.app(),
        "/api/v1/admin/users",
        json!({ "username": "manager", "email": "m2@test.com", "password": "long-enough-pass" }),
        &manager.token,
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}
