//! Handlers for events nested under
//! `/clients/{client_id}/contracts/{contract_id}/events`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use epic_core::event::{AssignSupport, CreateEvent, Event, EventFilter, UpdateEvent};
use epic_core::types::DbId;

use super::parse_json;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::WriteResponse;
use crate::state::AppState;

/// GET /api/v1/clients/{client_id}/contracts/{contract_id}/events
pub async fn list_by_contract(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<Event>>> {
    let events = state
        .workflow
        .list_events(Some((client_id, contract_id)), &EventFilter::default())
        .await?;
    Ok(Json(events))
}

/// GET /api/v1/clients/{client_id}/contracts/{contract_id}/events/{event_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((client_id, contract_id, event_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Event>> {
    let event = state
        .workflow
        .get_event(client_id, contract_id, event_id)
        .await?;
    Ok(Json(event))
}

/// POST /api/v1/clients/{client_id}/contracts/{contract_id}/events
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
    body: Bytes,
) -> AppResult<WriteResponse<Event>> {
    state.workflow.signed_contract(client_id, contract_id).await?;
    let input: CreateEvent = parse_json(&body)?;
    let applied = state
        .workflow
        .create_event(&user.actor(), client_id, contract_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// PUT /api/v1/clients/{client_id}/contracts/{contract_id}/events/{event_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id, event_id)): Path<(DbId, DbId, DbId)>,
    body: Bytes,
) -> AppResult<WriteResponse<Event>> {
    state
        .workflow
        .get_event(client_id, contract_id, event_id)
        .await?;
    let input: UpdateEvent = parse_json(&body)?;
    let applied = state
        .workflow
        .update_event(&user.actor(), client_id, contract_id, event_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// PATCH /api/v1/clients/{client_id}/contracts/{contract_id}/events/{event_id}/assign-support
pub async fn assign_support(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id, event_id)): Path<(DbId, DbId, DbId)>,
    body: Bytes,
) -> AppResult<WriteResponse<Event>> {
    state
        .workflow
        .get_event(client_id, contract_id, event_id)
        .await?;
    let input: AssignSupport = parse_json(&body)?;
    let applied = state
        .workflow
        .assign_support(&user.actor(), client_id, contract_id, event_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// DELETE /api/v1/clients/{client_id}/contracts/{contract_id}/events/{event_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id, event_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<WriteResponse<Event>> {
    let applied = state
        .workflow
        .delete_event(&user.actor(), client_id, contract_id, event_id)
        .await?;
    Ok(WriteResponse(applied))
}
