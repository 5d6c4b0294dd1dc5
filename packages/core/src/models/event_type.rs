//! Event Type Vocabulary
//!
//! Event types are reference-counted tags. A type exists while at least one
//! live event carries it; the store removes the record when the count would
//! drop to zero.

use serde::{Deserialize, Serialize};

/// Reference-counted event type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    /// Type name (unique key)
    #[serde(rename = "type")]
    pub name: String,

    /// Number of live events currently using this type (always >= 1)
    pub count: i64,
}
