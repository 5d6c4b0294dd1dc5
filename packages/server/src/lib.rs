//! HTTP API for the event planner
//!
//! This crate exposes the core services as a REST API under `/api`.
//!
//! # Architecture
//!
//! The server is organized into modular endpoint modules, each contributing a
//! `routes()` router that [`create_router`] merges:
//! - `event_endpoints`: event CRUD, listing and manual ordering
//! - `event_type_endpoints`: type vocabulary lookup
//!
//! Every response uses the same envelope: [`ApiResponse`] on success,
//! [`HttpError`] on failure.

use axum::{
    http::{header, Method, Uri},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use event_planner_core::db::{DatabaseService, EventStore, TursoStore};
use event_planner_core::services::{EventService, OrderingService};

pub mod config;
mod event_endpoints;
mod event_type_endpoints;
mod http_error;
mod response;

pub use config::ServerConfig;
pub use http_error::HttpError;
pub use response::ApiResponse;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub event_service: EventService,
    pub ordering_service: OrderingService,
}

impl AppState {
    /// Build both services over one store
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            event_service: EventService::new(store.clone()),
            ordering_service: OrderingService::new(store),
        }
    }
}

/// Create the main application router with all endpoint modules
pub fn create_router(state: AppState, cors_origin: Option<header::HeaderValue>) -> Router {
    Router::new()
        .merge(event_endpoints::routes(state.clone()))
        .merge(event_type_endpoints::routes(state))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}

async fn route_not_found(uri: Uri) -> HttpError {
    HttpError::with_details("Route not found", "ROUTE_NOT_FOUND", uri.path().to_string())
}

/// CORS layer
///
/// Restricted to `origin` when configured, any origin otherwise.
fn cors_layer(origin: Option<header::HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false);

    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Open the database and build the application state
pub async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let db = Arc::new(DatabaseService::new(config.database_path.clone()).await?);
    let store: Arc<dyn EventStore> = Arc::new(TursoStore::new(db));
    Ok(AppState::new(store))
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns error if the database cannot be opened or the server fails to
/// bind or start.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let app = create_router(state, config.cors_origin.clone());

    let addr = config.address();
    tracing::info!("HTTP server starting on http://{}", addr);
    match &config.cors_origin {
        Some(origin) => tracing::info!("CORS enabled for {:?}", origin),
        None => tracing::info!("CORS enabled for any origin"),
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
