//! Database Layer
//!
//! This module handles all persistence using libsql (embedded,
//! SQLite-compatible):
//!
//! - Database initialization and connection management (`DatabaseService`)
//! - The `EventStore` abstraction and its libsql implementation (`TursoStore`)
//! - Fractional ordering arithmetic shared by the ordering service
//!
//! # Architecture
//!
//! Services only see `Arc<dyn EventStore>`. `TursoStore` converts between
//! models and rows, `DatabaseService` owns the SQL.

mod database;
mod error;
mod event_store;
pub mod fractional_ordering;
mod turso_store;

pub use database::{DatabaseService, DbEventParams};
pub use error::DatabaseError;
pub use event_store::EventStore;
pub use fractional_ordering::{FractionalOrderCalculator, Neighbor};
pub use turso_store::TursoStore;
