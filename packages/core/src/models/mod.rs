//! Data Models
//!
//! This module contains the core data structures used throughout the event
//! planner:
//!
//! - `Event` - Calendar event with an optional manual ordering key
//! - `EventType` - Reference-counted type tag
//! - `EventQuery` / `DateRange` - List filters

mod event;
mod event_type;
mod query;

pub use event::{
    parse_instant, sort_events, validate_event_id, Event, EventPatch, NewEvent, ValidationError,
};
pub use event_type::EventType;
pub use query::{fold_case, DateRange, EventListParams, EventQuery};
