//! Event Type Endpoints
//!
//! - `GET /api/eventTypes?search=` - Type names in use, sorted, optionally
//!   filtered by a case-insensitive substring
//!
//! Types are maintained as a side effect of event writes; there is no
//! endpoint to create or delete them directly.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{ApiResponse, AppState, HttpError};

#[derive(Debug, Default, Deserialize)]
pub struct EventTypeQuery {
    search: Option<String>,
}

async fn list_event_types(
    State(state): State<AppState>,
    params: Result<Query<EventTypeQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<String>>, HttpError> {
    let Query(params) = params?;
    let types = state
        .event_service
        .list_event_types(params.search.as_deref())
        .await?;

    Ok(ApiResponse::ok("Event types retrieved successfully", types))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/eventTypes", get(list_event_types))
        .with_state(state)
}
