pub mod admin;
pub mod auth;
pub mod clients;
pub mod health;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                            login (public)
///
/// /admin/users                                           list, create (staff or Management)
///
/// /clients                                               list, create
/// /clients/{client_id}                                   get, update, delete
/// /clients/{client_id}/activate                          change status (PATCH)
/// /clients/{client_id}/contracts                         list, create
/// /clients/{client_id}/contracts/{contract_id}           get, update, delete
/// /clients/{client_id}/contracts/{contract_id}/sign      sign (PATCH)
/// /clients/{client_id}/contracts/{contract_id}/events    list, create
/// /clients/{client_id}/contracts/{contract_id}/events/{event_id}
///                                                        get, update, delete
/// /clients/{client_id}/contracts/{contract_id}/events/{event_id}/assign-support
///                                                        assign support (PATCH)
///
/// /contracts                                             search
/// /events                                                search
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/clients", clients::router())
        .merge(search::router())
}
