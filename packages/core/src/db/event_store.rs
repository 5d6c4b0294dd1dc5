//! EventStore Trait - Database Abstraction Layer
//!
//! This module defines the `EventStore` trait that abstracts persistence of
//! events and event types. Services depend on the trait, never on a concrete
//! backend, so the ordering logic can be exercised against any store.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async; backends may do network I/O
//! 2. **Ownership Semantics**: Methods take ownership of values to avoid
//!    unnecessary cloning
//! 3. **Error Handling**: Uses `anyhow::Result` for flexible error context
//! 4. **Atomic bulk writes**: `set_priorities` must apply all rows or none
//!
//! # Examples
//!
//! ```rust,no_run
//! use event_planner_core::db::{DatabaseService, EventStore, TursoStore};
//! use event_planner_core::models::{Event, NewEvent};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/events.db")).await?);
//!     let store: Arc<dyn EventStore> = Arc::new(TursoStore::new(db));
//!
//!     let event = Event::from_new(NewEvent {
//!         title: "Board meeting".to_string(),
//!         event_type: "Meeting".to_string(),
//!         start: "2025-04-15T09:00:00Z".to_string(),
//!         end: "2025-04-15T10:00:00Z".to_string(),
//!     })?;
//!     let created = store.create_event(event).await?;
//!     println!("Created event: {}", created.id);
//!     Ok(())
//! }
//! ```

use crate::models::{Event, EventQuery, EventType};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction layer for event persistence
///
/// Implementations must be `Send + Sync` so services can be shared across
/// Tokio tasks.
///
/// # Method Categories
///
/// - **Core CRUD**: create, get, update, delete
/// - **Querying**: batched lookup, date-range query, full scan
/// - **Ordering**: single priority write, atomic bulk rewrite, clear
/// - **Types**: reference-counted vocabulary listing
#[async_trait]
pub trait EventStore: Send + Sync {
    //
    // CORE CRUD OPERATIONS
    //

    /// Persist a new event and count its type
    ///
    /// The event's priority is ignored: new events are always unordered.
    async fn create_event(&self, event: Event) -> Result<Event>;

    /// Get event by ID
    ///
    /// - `Ok(Some(event))` if the event exists
    /// - `Ok(None)` if it doesn't (not an error)
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    /// Replace an event's title, type and time range
    ///
    /// The type stored at write time is released when the type changes.
    /// Priority is never written here.
    ///
    /// Returns `Ok(None)` if the event no longer exists.
    async fn update_event(&self, updated: Event) -> Result<Option<Event>>;

    /// Delete an event and release its type
    ///
    /// Returns `true` if a record was deleted.
    async fn delete_event(&self, id: &str) -> Result<bool>;

    //
    // QUERYING
    //

    /// Fetch several events in a single lookup
    ///
    /// Unknown IDs are silently skipped; order of the result is unspecified.
    async fn get_events_by_ids(&self, ids: &[&str]) -> Result<Vec<Event>>;

    /// Events matching a list query, unsorted
    async fn query_events(&self, query: &EventQuery) -> Result<Vec<Event>>;

    /// Every event in the collection, unsorted
    async fn all_events(&self) -> Result<Vec<Event>>;

    //
    // ORDERING
    //

    /// Write a single event's priority
    ///
    /// Returns `true` if the event existed.
    async fn set_priority(&self, id: &str, priority: Option<f64>) -> Result<bool>;

    /// Rewrite many priorities atomically (all rows or none)
    ///
    /// Returns the number of events updated.
    async fn set_priorities(&self, updates: Vec<(String, f64)>) -> Result<u64>;

    /// Set every event's priority to null
    ///
    /// Returns the number of events that had a priority.
    async fn clear_priorities(&self) -> Result<u64>;

    //
    // EVENT TYPES
    //

    /// Type records sorted by name, optionally filtered by a case-insensitive
    /// substring
    async fn list_event_types(&self, search: Option<&str>) -> Result<Vec<EventType>>;
}
