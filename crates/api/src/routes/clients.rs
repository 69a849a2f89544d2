//! Route definitions for the `/clients` resource.
//!
//! Contracts and events are nested under their parents so every write names
//! the full chain `client → contract → event`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{clients, contracts, events};
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET    /                                               -> clients::list
/// POST   /                                               -> clients::create
/// GET    /{client_id}                                    -> clients::get_by_id
/// PUT    /{client_id}                                    -> clients::update
/// DELETE /{client_id}                                    -> clients::delete
/// PATCH  /{client_id}/activate                           -> clients::change_status
///
/// GET    /{client_id}/contracts                          -> contracts::list_by_client
/// POST   /{client_id}/contracts                          -> contracts::create
/// GET    /{client_id}/contracts/{contract_id}            -> contracts::get_by_id
/// PUT    /{client_id}/contracts/{contract_id}            -> contracts::update
/// DELETE /{client_id}/contracts/{contract_id}            -> contracts::delete
/// PATCH  /{client_id}/contracts/{contract_id}/sign       -> contracts::sign
///
/// GET    /{client_id}/contracts/{contract_id}/events     -> events::list_by_contract
/// POST   /{client_id}/contracts/{contract_id}/events     -> events::create
/// GET    .../events/{event_id}                           -> events::get_by_id
/// PUT    .../events/{event_id}                           -> events::update
/// DELETE .../events/{event_id}                           -> events::delete
/// PATCH  .../events/{event_id}/assign-support            -> events::assign_support
/// ```
pub fn router() -> Router<AppState> {
    let event_routes = Router::new()
        .route("/", get(events::list_by_contract).post(events::create))
        .route(
            "/{event_id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{event_id}/assign-support", patch(events::assign_support));

    let contract_routes = Router::new()
        .route("/", get(contracts::list_by_client).post(contracts::create))
        .route(
            "/{contract_id}",
            get(contracts::get_by_id)
                .put(contracts::update)
                .delete(contracts::delete),
        )
        .route("/{contract_id}/sign", patch(contracts::sign))
        .nest("/{contract_id}/events", event_routes);

    Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{client_id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        )
        .route("/{client_id}/activate", patch(clients::change_status))
        .nest("/{client_id}/contracts", contract_routes)
}
