use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Top-level search routes.
///
/// ```text
/// GET /contracts  -> search::contracts
/// GET /events     -> search::events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contracts", get(search::contracts))
        .route("/events", get(search::events))
}
