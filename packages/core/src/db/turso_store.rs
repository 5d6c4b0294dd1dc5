//! TursoStore - EventStore Implementation for the libsql Backend
//!
//! TursoStore wraps `DatabaseService` and delegates every operation to its
//! `db_*` methods. Its own job is conversion: models to SQL parameters on the
//! way in, `libsql::Row` to models on the way out.
//!
//! # Examples
//!
//! ```rust,no_run
//! use event_planner_core::db::{DatabaseService, EventStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/test.db")).await?);
//!     let store: Arc<dyn EventStore> = Arc::new(TursoStore::new(db));
//!
//!     let event = store.get_event("7b0d6f0e-2f7a-4d3e-9a51-6f1c2e3d4b5a").await?;
//!     Ok(())
//! }
//! ```

use crate::db::database::DbEventParams;
use crate::db::event_store::EventStore;
use crate::db::DatabaseService;
use crate::models::{fold_case, Event, EventQuery, EventType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::Row;
use std::sync::Arc;

/// TursoStore implements EventStore for the libsql backend
pub struct TursoStore {
    /// Underlying database service (raw SQL operations)
    db: Arc<DatabaseService>,
}

impl TursoStore {
    /// Create a new TursoStore wrapper
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Convert epoch milliseconds from the database into a UTC instant
    fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(ms)
            .ok_or_else(|| anyhow::anyhow!("Timestamp out of range: {}", ms))
    }

    /// Convert libsql::Row to Event model
    ///
    /// # Row Format
    ///
    /// Expected columns (in order, see `EVENT_COLUMNS`):
    /// - id (TEXT)
    /// - title (TEXT)
    /// - event_type (TEXT)
    /// - start_at (INTEGER, epoch ms)
    /// - end_at (INTEGER, epoch ms)
    /// - priority (REAL, nullable)
    /// - created_at (INTEGER, epoch ms)
    /// - updated_at (INTEGER, epoch ms)
    fn row_to_event(row: &Row) -> Result<Event> {
        let id: String = row.get(0).context("Failed to get id")?;
        let title: String = row.get(1).context("Failed to get title")?;
        let event_type: String = row.get(2).context("Failed to get event_type")?;
        let start_at: i64 = row.get(3).context("Failed to get start_at")?;
        let end_at: i64 = row.get(4).context("Failed to get end_at")?;
        let priority: Option<f64> = row.get(5).context("Failed to get priority")?;
        let created_at: i64 = row.get(6).context("Failed to get created_at")?;
        let updated_at: i64 = row.get(7).context("Failed to get updated_at")?;

        Ok(Event {
            id,
            title,
            event_type,
            start: Self::from_millis(start_at).context("Failed to parse start_at")?,
            end: Self::from_millis(end_at).context("Failed to parse end_at")?,
            priority,
            created_at: Self::from_millis(created_at).context("Failed to parse created_at")?,
            updated_at: Self::from_millis(updated_at).context("Failed to parse updated_at")?,
        })
    }

    async fn collect_events(mut rows: libsql::Rows) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .context("Failed to read event row")?
        {
            events.push(Self::row_to_event(&row)?);
        }
        Ok(events)
    }

    fn params(event: &Event) -> DbEventParams<'_> {
        DbEventParams {
            id: &event.id,
            title: &event.title,
            event_type: &event.event_type,
            start_at: event.start.timestamp_millis(),
            end_at: event.end.timestamp_millis(),
            created_at: event.created_at.timestamp_millis(),
            updated_at: event.updated_at.timestamp_millis(),
        }
    }
}

#[async_trait]
impl EventStore for TursoStore {
    async fn create_event(&self, event: Event) -> Result<Event> {
        self.db
            .db_insert_event(Self::params(&event))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create event: {}", e))?;

        self.get_event(&event.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Event not found after creation"))
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        match self
            .db
            .db_get_event(id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get event: {}", e))?
        {
            Some(row) => Ok(Some(Self::row_to_event(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_event(&self, updated: Event) -> Result<Option<Event>> {
        let changed = self
            .db
            .db_update_event(Self::params(&updated))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update event: {}", e))?;

        if changed == 0 {
            return Ok(None);
        }

        self.get_event(&updated.id).await
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        let deleted = self
            .db
            .db_delete_event(id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete event: {}", e))?;

        Ok(deleted > 0)
    }

    async fn get_events_by_ids(&self, ids: &[&str]) -> Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .db
            .db_get_events_by_ids(ids)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to look up events: {}", e))?;

        Self::collect_events(rows).await
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        if query.range.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .db
            .db_query_events(
                query.range.from.timestamp_millis(),
                query.range.to.timestamp_millis(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to query events: {}", e))?;

        let mut events = Self::collect_events(rows).await?;
        events.retain(|event| query.matches(event));
        Ok(events)
    }

    async fn all_events(&self) -> Result<Vec<Event>> {
        let rows = self
            .db
            .db_all_events()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load events: {}", e))?;

        Self::collect_events(rows).await
    }

    async fn set_priority(&self, id: &str, priority: Option<f64>) -> Result<bool> {
        let changed = self
            .db
            .db_set_priority(id, priority)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to set priority: {}", e))?;

        Ok(changed > 0)
    }

    async fn set_priorities(&self, updates: Vec<(String, f64)>) -> Result<u64> {
        let borrowed: Vec<(&str, f64)> = updates
            .iter()
            .map(|(id, priority)| (id.as_str(), *priority))
            .collect();

        self.db
            .db_batch_set_priorities(&borrowed)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to rewrite priorities: {}", e))
    }

    async fn clear_priorities(&self) -> Result<u64> {
        self.db
            .db_clear_priorities()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to clear priorities: {}", e))
    }

    async fn list_event_types(&self, search: Option<&str>) -> Result<Vec<EventType>> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(fold_case);

        let mut rows = self
            .db
            .db_list_event_types()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list event types: {}", e))?;

        let mut types = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .context("Failed to read event type row")?
        {
            let name: String = row.get(0).context("Failed to get type")?;
            if let Some(needle) = &needle {
                if !fold_case(&name).contains(needle.as_str()) {
                    continue;
                }
            }
            types.push(EventType {
                name,
                count: row.get(1).context("Failed to get count")?,
            });
        }
        Ok(types)
    }
}
