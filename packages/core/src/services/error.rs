//! Service Layer Error Types
//!
//! This module defines the error type returned by every service operation.
//! Callers translate it into transport responses; services never do.

use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum EventServiceError {
    /// Malformed or self-referential request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload failed model validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Event not found by ID
    #[error("Event not found: {id}")]
    EventNotFound { id: String },

    /// Read or write against the store failed
    #[error("Storage operation failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl EventServiceError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an event not found error
    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::EventNotFound { id: id.into() }
    }

    /// True for errors caused by the request rather than the backend
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, EventServiceError>;
