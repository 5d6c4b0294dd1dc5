//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `EventService` - CRUD operations and listing in display order
//! - `OrderingService` - Fractional reordering, normalization and reset
//!
//! Services coordinate between the database layer and application logic,
//! implementing business rules on top of `Arc<dyn EventStore>`.

pub mod error;
pub mod event_service;
pub mod ordering_service;

pub use error::{EventServiceError, ServiceResult};
pub use event_service::EventService;
pub use ordering_service::{OrderingService, ReorderOutcome, ReorderRequest};
