//! Event Planner Core Business Logic Layer
//!
//! This crate provides data management, persistence and manual ordering for
//! the event planner backend.
//!
//! # Architecture
//!
//! - **Fractional ordering**: a manual move writes one real-number key on the
//!   moved event; the collection is only rewritten when keys run out of room
//! - **libsql/Turso**: embedded SQLite-compatible database
//! - **One comparator**: every listing and every normalization sorts with
//!   [`Event::order_cmp`]
//!
//! # Modules
//!
//! - [`models`] - Data structures (Event, EventType, query parameters)
//! - [`services`] - Business services (EventService, OrderingService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
