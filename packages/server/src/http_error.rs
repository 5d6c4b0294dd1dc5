//! HTTP error handling
//!
//! Every failure leaves the server in the same envelope shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "User-facing error message",
//!   "code": "MACHINE_READABLE_CODE",
//!   "details": "Optional debugging information"
//! }
//! ```

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use event_planner_core::services::EventServiceError;
use serde::{Deserialize, Serialize};

/// HTTP error response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// Always `false`; mirrors the success envelope
    pub success: bool,
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Status code for this error's code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_INPUT" | "VALIDATION_ERROR" | "EVENT_NOT_FOUND" => StatusCode::BAD_REQUEST,
            "ROUTE_NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<EventServiceError> for HttpError {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::InvalidInput(message) => HttpError::new(message, "INVALID_INPUT"),
            EventServiceError::Validation(err) => HttpError::new(err.to_string(), "VALIDATION_ERROR"),
            EventServiceError::EventNotFound { id } => {
                HttpError::with_details("Event not found", "EVENT_NOT_FOUND", id)
            }
            EventServiceError::Storage(err) => {
                tracing::error!("Storage failure: {:?}", err);
                HttpError::with_details("Internal server error", "DATABASE_ERROR", err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::with_details("Invalid request body", "INVALID_INPUT", rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::with_details("Invalid query parameters", "INVALID_INPUT", rejection.body_text())
    }
}
