//! Handlers for the `/clients` resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use epic_core::client::{
    ChangeClientStatus, Client, ClientFilter, ClientStatus, CreateClient, UpdateClient,
};
use epic_core::types::DbId;

use super::{optional_json, parse_json};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::WriteResponse;
use crate::state::AppState;

/// GET /api/v1/clients?name=&email=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<ClientFilter>,
) -> AppResult<Json<Vec<Client>>> {
    let clients = state.workflow.list_clients(&filter).await?;
    Ok(Json(clients))
}

/// GET /api/v1/clients/{client_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = state.workflow.get_client(client_id).await?;
    Ok(Json(client))
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> AppResult<WriteResponse<Client>> {
    let input: CreateClient = parse_json(&body)?;
    let applied = state.workflow.create_client(&user.actor(), input).await?;
    Ok(WriteResponse(applied))
}

/// PUT /api/v1/clients/{client_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<DbId>,
    body: Bytes,
) -> AppResult<WriteResponse<Client>> {
    state.workflow.get_client(client_id).await?;
    let input: UpdateClient = parse_json(&body)?;
    let applied = state
        .workflow
        .update_client(&user.actor(), client_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// PATCH /api/v1/clients/{client_id}/activate
///
/// An empty body activates the client. `{"status": "Inactive"}` (or any
/// other status) is written as is.
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<DbId>,
    body: Bytes,
) -> AppResult<WriteResponse<Client>> {
    state.workflow.get_client(client_id).await?;
    let request: ChangeClientStatus = optional_json(&body)?;
    let applied = state
        .workflow
        .change_client_status(
            &user.actor(),
            client_id,
            request.status.unwrap_or(ClientStatus::Active),
        )
        .await?;
    Ok(WriteResponse(applied))
}

/// DELETE /api/v1/clients/{client_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<DbId>,
) -> AppResult<WriteResponse<Client>> {
    let applied = state.workflow.delete_client(&user.actor(), client_id).await?;
    Ok(WriteResponse(applied))
}
