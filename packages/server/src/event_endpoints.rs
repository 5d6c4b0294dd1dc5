//! Event Endpoints
//!
//! # Endpoints
//!
//! - `GET /api` - Health check
//! - `GET /api/events?startDate=&endDate=&keyword=` - List events in display order
//! - `POST /api/events` - Create an event
//! - `GET /api/events/:id` - Get an event by ID
//! - `PUT /api/events/:id` - Partially update an event
//! - `DELETE /api/events/:id` - Delete an event
//! - `POST /api/events/reorder` - Move one event between two others
//! - `POST /api/events/resetOrder` - Clear every manual priority
//! - `POST /api/events/normalize` - Rewrite priorities to evenly spaced values

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{ApiResponse, AppState, HttpError};
use event_planner_core::models::{Event, EventListParams, EventPatch, NewEvent};
use event_planner_core::services::{EventServiceError, ReorderOutcome, ReorderRequest};

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ResetSummary {
    pub cleared: u64,
}

#[derive(Debug, Serialize)]
pub struct NormalizeSummary {
    pub normalized: u64,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:8000/api
/// ```
async fn health_check() -> ApiResponse<HealthStatus> {
    ApiResponse::ok(
        "API is running",
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// List events in a date range
///
/// # Query Parameters
///
/// - `startDate`, `endDate` (required): `YYYY-MM-DD` or RFC 3339
/// - `keyword` (optional): prefix of title or type
///
/// ```bash
/// curl "http://localhost:8000/api/events?startDate=2025-04-14&endDate=2025-04-20&keyword=div"
/// ```
async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<EventListParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Event>>, HttpError> {
    let Query(params) = params?;
    let query = params.into_query().map_err(EventServiceError::from)?;

    let events = state.event_service.list_events(query).await?;
    Ok(ApiResponse::ok("Events retrieved successfully", events))
}

/// Create a new event
///
/// ```bash
/// curl -X POST http://localhost:8000/api/events \
///   -H "Content-Type: application/json" \
///   -d '{"title":"Q1 Earnings Call","type":"Earnings","start":"2025-04-15T09:00:00Z","end":"2025-04-15T10:00:00Z"}'
/// ```
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<ApiResponse<Event>, HttpError> {
    let Json(draft) = payload?;
    let event = state.event_service.create_event(draft).await?;

    tracing::debug!("Created event: {}", event.id);
    Ok(ApiResponse::created("Event created successfully", event))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>, HttpError> {
    let event = state.event_service.get_event(&id).await?;
    Ok(ApiResponse::ok("Event retrieved successfully", event))
}

/// Update an existing event
///
/// Only the fields present in the body change. `priority` is not accepted
/// here; use `/api/events/reorder`.
///
/// ```bash
/// curl -X PUT http://localhost:8000/api/events/<id> \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Q1 Earnings Call (moved)"}'
/// ```
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<ApiResponse<Event>, HttpError> {
    let Json(patch) = payload?;
    let event = state.event_service.update_event(&id, patch).await?;

    tracing::debug!("Updated event: {}", id);
    Ok(ApiResponse::ok("Event updated successfully", event))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>, HttpError> {
    let event = state.event_service.delete_event(&id).await?;

    tracing::debug!("Deleted event: {}", id);
    Ok(ApiResponse::ok("Event deleted successfully", event))
}

/// Move one event between two neighbors
///
/// # Request Body
///
/// - `movedId` (alias `draggedId`): the event being moved
/// - `beforeId` / `afterId`: the events that should end up immediately
///   before / after it; `null` or omitted means "moved to that end"
///
/// ```bash
/// curl -X POST http://localhost:8000/api/events/reorder \
///   -H "Content-Type: application/json" \
///   -d '{"movedId":"<id>","beforeId":"<id>","afterId":null}'
/// ```
async fn reorder_events(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<ApiResponse<ReorderOutcome>, HttpError> {
    let Json(request) = payload?;
    let outcome = state.ordering_service.reorder(request).await?;
    Ok(ApiResponse::ok("Events reordered successfully", outcome))
}

async fn reset_order(
    State(state): State<AppState>,
) -> Result<ApiResponse<ResetSummary>, HttpError> {
    let cleared = state.ordering_service.reset_order().await?;
    Ok(ApiResponse::ok(
        "Event order reset successfully",
        ResetSummary { cleared },
    ))
}

async fn normalize_order(
    State(state): State<AppState>,
) -> Result<ApiResponse<NormalizeSummary>, HttpError> {
    let normalized = state.ordering_service.normalize().await?;
    Ok(ApiResponse::ok(
        "Event order normalized successfully",
        NormalizeSummary { normalized },
    ))
}

/// Create router with all event endpoints
///
/// Called by [`create_router`](crate::create_router), which merges it with
/// the other endpoint modules.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api", get(health_check))
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/reorder", post(reorder_events))
        .route("/api/events/resetOrder", post(reset_order))
        .route("/api/events/normalize", post(normalize_order))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}
