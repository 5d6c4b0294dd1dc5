//! Ordering Service - Manual event ordering
//!
//! Persists drag-and-drop ordering with one write per move. A moved event gets
//! a key between its new neighbors (see [`FractionalOrderCalculator`]); only
//! when the neighbors cannot provide one, or their keys are about to become
//! indistinguishable, is the whole collection rebalanced.
//!
//! # Operations
//!
//! - [`reorder`](OrderingService::reorder) - place one event between two others
//! - [`normalize`](OrderingService::normalize) - rewrite every key to evenly
//!   spaced values, preserving display order
//! - [`reset_order`](OrderingService::reset_order) - drop every key
//!
//! No locking is done across requests. Two concurrent moves over the same
//! neighbors are last-write-wins on the moved record; because rebalancing
//! preserves relative order, any interleaving still yields a consistent total
//! order.

use crate::db::{EventStore, FractionalOrderCalculator, Neighbor};
use crate::models::{sort_events, validate_event_id, Event};
use crate::services::error::{EventServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Move `moved_id` so that it sits between `before_id` and `after_id`
///
/// A missing neighbor means "moved to that end of the list".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[serde(alias = "draggedId", default)]
    pub moved_id: String,

    #[serde(default)]
    pub before_id: Option<String>,

    #[serde(default)]
    pub after_id: Option<String>,
}

impl ReorderRequest {
    pub fn new(
        moved_id: impl Into<String>,
        before_id: Option<&str>,
        after_id: Option<&str>,
    ) -> Self {
        Self {
            moved_id: moved_id.into(),
            before_id: before_id.map(str::to_string),
            after_id: after_id.map(str::to_string),
        }
    }

    /// Trim ids, treat blank neighbors as absent and reject malformed input
    fn validated(self) -> ServiceResult<Self> {
        let moved_id = self.moved_id.trim().to_string();
        if moved_id.is_empty() {
            return Err(EventServiceError::invalid_input("movedId is required"));
        }
        let blank_to_none = |id: Option<String>| {
            id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        let before_id = blank_to_none(self.before_id);
        let after_id = blank_to_none(self.after_id);

        for id in std::iter::once(&moved_id)
            .chain(before_id.iter())
            .chain(after_id.iter())
        {
            validate_event_id(id)?;
        }

        if before_id.is_some() && before_id == after_id {
            return Err(EventServiceError::invalid_input(
                "beforeId and afterId must differ",
            ));
        }
        if before_id.as_deref() == Some(moved_id.as_str())
            || after_id.as_deref() == Some(moved_id.as_str())
        {
            return Err(EventServiceError::invalid_input(
                "An event cannot be its own neighbor",
            ));
        }

        Ok(Self {
            moved_id,
            before_id,
            after_id,
        })
    }
}

/// Result of a successful reorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderOutcome {
    pub id: String,

    /// The moved event's key once the operation completed
    pub priority: f64,

    /// Whether the collection was rebalanced while handling the move
    pub normalized: bool,
}

/// Priority assignment and rebalancing over the event collection
#[derive(Clone)]
pub struct OrderingService {
    store: Arc<dyn EventStore>,
}

impl OrderingService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Place one event between two neighbors, writing only its priority
    ///
    /// 1. Look up the moved event and both neighbors in one batch
    /// 2. Compute a key from the neighbors' keys (midpoint, or one `GAP` past
    ///    a single neighbor)
    /// 3. If no key fits (unordered or colliding neighbors, no neighbors at
    ///    all), normalize, look up again and compute once more
    /// 4. Persist the key on the moved event
    /// 5. If the neighbors used for a midpoint were closer than `MIN_GAP`,
    ///    normalize right away
    ///
    /// # Errors
    ///
    /// - `InvalidInput` / `Validation` for malformed or self-referential ids
    /// - `EventNotFound` if the moved event does not exist
    /// - `Storage` if any read or write fails
    #[instrument(skip(self), fields(moved = %request.moved_id))]
    pub async fn reorder(&self, request: ReorderRequest) -> ServiceResult<ReorderOutcome> {
        let request = request.validated()?;
        let mut normalized = false;

        let (before, after) = self.lookup_neighbors(&request).await?;
        let (priority, used) = match FractionalOrderCalculator::calculate_order(before, after) {
            Some(priority) => (priority, (before, after)),
            None => {
                if let (Neighbor::Ordered(prev), Neighbor::Ordered(next)) = (before, after) {
                    warn!(
                        "Neighbor priorities out of order ({} >= {}), normalizing",
                        prev, next
                    );
                } else {
                    debug!(?before, ?after, "No usable neighbor priority, normalizing");
                }

                self.normalize().await?;
                normalized = true;

                let (before, after) = self.lookup_neighbors(&request).await?;
                (
                    FractionalOrderCalculator::calculate_order_after_rebalance(before, after),
                    (before, after),
                )
            }
        };

        if !self
            .store
            .set_priority(&request.moved_id, Some(priority))
            .await?
        {
            return Err(EventServiceError::event_not_found(&request.moved_id));
        }
        debug!("Assigned priority {} to {}", priority, request.moved_id);

        if FractionalOrderCalculator::needs_rebalancing(used.0, used.1) {
            info!("Neighbor gap below minimum after placing {}, normalizing", request.moved_id);
            self.normalize().await?;
            normalized = true;
        }

        let priority = if normalized {
            self.store
                .get_event(&request.moved_id)
                .await?
                .and_then(|event| event.priority)
                .ok_or_else(|| EventServiceError::event_not_found(&request.moved_id))?
        } else {
            priority
        };

        Ok(ReorderOutcome {
            id: request.moved_id,
            priority,
            normalized,
        })
    }

    /// Rewrite every priority to `index * STEP` in current display order
    ///
    /// Idempotent, preserves relative order, and applies atomically.
    /// Returns the number of events rewritten.
    #[instrument(skip(self))]
    pub async fn normalize(&self) -> ServiceResult<u64> {
        let mut events = self.store.all_events().await?;
        sort_events(&mut events);

        let previously_unordered = events.iter().filter(|e| !e.is_ordered()).count();
        let keys = FractionalOrderCalculator::rebalance(events.len());
        let updates: Vec<(String, f64)> = events
            .into_iter()
            .zip(keys)
            .map(|(event, key)| (event.id, key))
            .collect();

        let rewritten = self.store.set_priorities(updates).await?;
        info!(
            "Normalized priorities of {} events ({} previously unordered)",
            rewritten, previously_unordered
        );
        Ok(rewritten)
    }

    /// Clear every priority, returning the collection to start-time order
    #[instrument(skip(self))]
    pub async fn reset_order(&self) -> ServiceResult<u64> {
        let cleared = self.store.clear_priorities().await?;
        info!("Cleared priorities of {} events", cleared);
        Ok(cleared)
    }

    /// Batched lookup of the moved event and its requested neighbors
    async fn lookup_neighbors(
        &self,
        request: &ReorderRequest,
    ) -> ServiceResult<(Neighbor, Neighbor)> {
        let mut ids: Vec<&str> = vec![request.moved_id.as_str()];
        ids.extend(request.before_id.as_deref());
        ids.extend(request.after_id.as_deref());

        let found = self.store.get_events_by_ids(&ids).await?;
        if !found.iter().any(|event| event.id == request.moved_id) {
            return Err(EventServiceError::event_not_found(&request.moved_id));
        }

        let neighbor = |id: Option<&str>| {
            let record: Option<&Event> =
                id.and_then(|id| found.iter().find(|event| event.id == id));
            Neighbor::from_record(record)
        };

        Ok((
            neighbor(request.before_id.as_deref()),
            neighbor(request.after_id.as_deref()),
        ))
    }
}
