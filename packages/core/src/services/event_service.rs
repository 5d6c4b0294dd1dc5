//! Event Service - CRUD and listing
//!
//! Validates payloads, delegates persistence to an [`EventStore`] and applies
//! the display order to every listing. Event type counts are maintained by the
//! store in the same transaction as the event write.
//!
//! Priorities are never written here; see `OrderingService`.

use crate::db::EventStore;
use crate::models::{
    sort_events, validate_event_id, Event, EventPatch, EventQuery, NewEvent,
};
use crate::services::error::{EventServiceError, ServiceResult};
use std::sync::Arc;

/// CRUD and listing over the event collection
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Create a new, unordered event
    pub async fn create_event(&self, draft: NewEvent) -> ServiceResult<Event> {
        let event = Event::from_new(draft)?;
        let created = self.store.create_event(event).await?;

        tracing::debug!("Created event {} ({})", created.id, created.event_type);
        Ok(created)
    }

    /// Fetch one event
    pub async fn get_event(&self, id: &str) -> ServiceResult<Event> {
        validate_event_id(id)?;

        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| EventServiceError::event_not_found(id))
    }

    /// Apply a partial update
    ///
    /// An empty patch returns the current record untouched.
    pub async fn update_event(&self, id: &str, patch: EventPatch) -> ServiceResult<Event> {
        let current = self.get_event(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let merged = current.apply_patch(patch)?;
        let updated = self
            .store
            .update_event(merged)
            .await?
            .ok_or_else(|| EventServiceError::event_not_found(id))?;

        if current.event_type != updated.event_type {
            tracing::debug!(
                "Event {} moved from type '{}' to '{}'",
                id,
                current.event_type,
                updated.event_type
            );
        }
        Ok(updated)
    }

    /// Delete an event, returning the record as it was
    pub async fn delete_event(&self, id: &str) -> ServiceResult<Event> {
        let current = self.get_event(id).await?;

        if !self.store.delete_event(id).await? {
            return Err(EventServiceError::event_not_found(id));
        }

        tracing::debug!("Deleted event {}", id);
        Ok(current)
    }

    /// Events in a date range, in display order
    ///
    /// Ordered events come first by priority, then unordered events by start.
    pub async fn list_events(&self, query: EventQuery) -> ServiceResult<Vec<Event>> {
        let mut events = self.store.query_events(&query).await?;
        sort_events(&mut events);
        Ok(events)
    }

    /// Type names currently in use, sorted ascending
    pub async fn list_event_types(&self, search: Option<&str>) -> ServiceResult<Vec<String>> {
        let types = self.store.list_event_types(search).await?;
        Ok(types.into_iter().map(|t| t.name).collect())
    }
}
