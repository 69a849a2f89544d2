//! Cross-client search over contracts and events.

use axum::extract::{Query, State};
use axum::Json;
use epic_core::contract::{Contract, ContractFilter};
use epic_core::event::{Event, EventFilter};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/contracts?company_name=&client_email=&contract_date=&amount=
pub async fn contracts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<ContractFilter>,
) -> AppResult<Json<Vec<Contract>>> {
    let contracts = state.workflow.list_contracts(&filter).await?;
    Ok(Json(contracts))
}

/// GET /api/v1/events?company_name=&client_email=&event_date=
pub async fn events(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Vec<Event>>> {
    let events = state.workflow.list_events(None, &filter).await?;
    Ok(Json(events))
}
