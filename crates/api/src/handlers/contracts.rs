//! Handlers for contracts nested under `/clients/{client_id}/contracts`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use epic_core::contract::{
    Contract, ContractFilter, CreateContract, SignContractRequest, SignedContract, UpdateContract,
};
use epic_core::types::DbId;

use super::{optional_json, parse_json};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::WriteResponse;
use crate::state::AppState;

/// GET /api/v1/clients/{client_id}/contracts
pub async fn list_by_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Vec<Contract>>> {
    let contracts = state
        .workflow
        .list_contracts(&ContractFilter::for_client(client_id))
        .await?;
    Ok(Json(contracts))
}

/// GET /api/v1/clients/{client_id}/contracts/{contract_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Contract>> {
    let contract = state.workflow.get_contract(client_id, contract_id).await?;
    Ok(Json(contract))
}

/// POST /api/v1/clients/{client_id}/contracts
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<DbId>,
    body: Bytes,
) -> AppResult<WriteResponse<Contract>> {
    state.workflow.active_client(client_id).await?;
    let input: CreateContract = parse_json(&body)?;
    let applied = state
        .workflow
        .create_contract(&user.actor(), client_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// PUT /api/v1/clients/{client_id}/contracts/{contract_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
    body: Bytes,
) -> AppResult<WriteResponse<Contract>> {
    state.workflow.get_contract(client_id, contract_id).await?;
    let input: UpdateContract = parse_json(&body)?;
    let applied = state
        .workflow
        .update_contract(&user.actor(), client_id, contract_id, input)
        .await?;
    Ok(WriteResponse(applied))
}

/// PATCH /api/v1/clients/{client_id}/contracts/{contract_id}/sign
///
/// Signs the contract and returns it together with the event created
/// alongside it.
pub async fn sign(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
    body: Bytes,
) -> AppResult<WriteResponse<SignedContract>> {
    state.workflow.get_contract(client_id, contract_id).await?;
    let request: SignContractRequest = optional_json(&body)?;
    let applied = state
        .workflow
        .sign_contract(&user.actor(), client_id, contract_id, request)
        .await?;
    Ok(WriteResponse(applied))
}

/// DELETE /api/v1/clients/{client_id}/contracts/{contract_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((client_id, contract_id)): Path<(DbId, DbId)>,
) -> AppResult<WriteResponse<Contract>> {
    let applied = state
        .workflow
        .delete_contract(&user.actor(), client_id, contract_id)
        .await?;
    Ok(WriteResponse(applied))
}
