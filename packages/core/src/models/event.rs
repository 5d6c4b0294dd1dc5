//! Event Data Structures
//!
//! This module defines the `Event` struct, the request-side shapes used to
//! create and patch events, and the ordering rule every list of events obeys.
//!
//! # Ordering
//!
//! Events carry an optional `priority`. Ordered events (priority present) sort
//! before unordered ones; within each group ties fall back to the start
//! instant. See [`Event::order_cmp`].
//!
//! # Examples
//!
//! ```rust
//! use event_planner_core::models::{Event, NewEvent};
//!
//! let draft = NewEvent {
//!     title: "Q1 Earnings Call".to_string(),
//!     event_type: "Dividends".to_string(),
//!     start: "2025-04-15T09:00:00Z".to_string(),
//!     end: "2025-04-15T10:00:00Z".to_string(),
//! };
//! let event = Event::from_new(draft).unwrap();
//! assert!(event.priority.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for event payloads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing required date parameters")]
    MissingDateRange,

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Start date must be before end date")]
    InvalidTimeRange,

    #[error("Invalid event ID format: {0}")]
    InvalidId(String),
}

/// A calendar event
///
/// # Fields
///
/// - `id`: UUID assigned at creation, never reused
/// - `title`: Non-empty title
/// - `event_type`: Non-empty type name, serialized as `type`
/// - `start` / `end`: UTC instants, `start < end`
/// - `priority`: Manual ordering key, `None` when the event is unordered
/// - `created_at` / `updated_at`: Bookkeeping timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,

    pub title: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub start: DateTime<Utc>,

    pub end: DateTime<Utc>,

    /// Manual ordering key (smaller sorts earlier, `None` sorts last)
    pub priority: Option<f64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an event
///
/// Dates are kept as raw strings so that a missing field and an unparsable
/// field can be reported separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default)]
    pub event_type: String,

    #[serde(default)]
    pub start: String,

    #[serde(default)]
    pub end: String,
}

/// Partial event update
///
/// Only provided fields change. Priority is deliberately absent: it is only
/// written by the ordering service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl EventPatch {
    /// True when the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.event_type.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

/// Parse an RFC 3339 instant into UTC
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidDate)
}

/// Check that an identifier is a well-formed UUID
pub fn validate_event_id(id: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidId(id.to_string()))
}

impl Event {
    /// Build a fresh, unordered event from a creation payload
    ///
    /// # Errors
    ///
    /// - `MissingFields` if any of title, type, start or end is blank
    /// - `InvalidDate` if a date is not RFC 3339
    /// - `InvalidTimeRange` unless `start < end`
    pub fn from_new(draft: NewEvent) -> Result<Self, ValidationError> {
        let title = draft.title.trim();
        let event_type = draft.event_type.trim();
        if title.is_empty()
            || event_type.is_empty()
            || draft.start.trim().is_empty()
            || draft.end.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        let start = parse_instant(&draft.start)?;
        let end = parse_instant(&draft.end)?;
        if start >= end {
            return Err(ValidationError::InvalidTimeRange);
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            event_type: event_type.to_string(),
            start,
            end,
            priority: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch, returning the merged event
    ///
    /// The merged record is re-validated as a whole, so moving `start` past an
    /// unchanged `end` is rejected.
    pub fn apply_patch(&self, patch: EventPatch) -> Result<Self, ValidationError> {
        let mut merged = self.clone();

        if let Some(title) = patch.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(ValidationError::MissingField("title".to_string()));
            }
            merged.title = title.to_string();
        }
        if let Some(event_type) = patch.event_type {
            let event_type = event_type.trim();
            if event_type.is_empty() {
                return Err(ValidationError::MissingField("type".to_string()));
            }
            merged.event_type = event_type.to_string();
        }
        if let Some(start) = patch.start {
            merged.start = parse_instant(&start)?;
        }
        if let Some(end) = patch.end {
            merged.end = parse_instant(&end)?;
        }
        if merged.start >= merged.end {
            return Err(ValidationError::InvalidTimeRange);
        }

        merged.updated_at = Utc::now();
        Ok(merged)
    }

    /// Total order used for every event listing
    ///
    /// 1. Both ordered: priority ascending, then start ascending
    /// 2. Ordered before unordered
    /// 3. Both unordered: start ascending
    ///
    /// The id breaks any remaining tie so sorts are deterministic.
    pub fn order_cmp(&self, other: &Self) -> Ordering {
        let by_priority = match (self.priority, other.priority) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_priority
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Whether this event carries a manual ordering key
    pub fn is_ordered(&self) -> bool {
        self.priority.is_some()
    }
}

/// Sort a slice of events in place by [`Event::order_cmp`]
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(Event::order_cmp);
}
