//! Event list queries
//!
//! A list query always covers a closed range of UTC calendar days, matched
//! against each event's start instant, and may carry a keyword that matches
//! the beginning of the title or the type (case-insensitive).

use crate::models::{Event, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive range of UTC days
///
/// `from` is the first millisecond of the start day, `to` the last millisecond
/// of the end day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Build a range from two calendar days
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> Self {
        let from = start.and_time(NaiveTime::MIN).and_utc();
        let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        let to = end.and_time(last_ms).and_utc();
        Self { from, to }
    }

    /// Build a range from raw query parameters
    ///
    /// Each bound is either `YYYY-MM-DD` or an RFC 3339 instant, in which case
    /// its UTC calendar day is used.
    ///
    /// # Errors
    ///
    /// - `MissingDateRange` if either bound is absent or blank
    /// - `InvalidDate` if either bound cannot be parsed
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let (start, end) = match (start.map(str::trim), end.map(str::trim)) {
            (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => (s, e),
            _ => return Err(ValidationError::MissingDateRange),
        };

        Ok(Self::from_days(parse_day(start)?, parse_day(end)?))
    }

    /// True when the range selects nothing (`from` after `to`)
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// True when `instant` falls inside the range, both ends included
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.from && *instant <= self.to
    }
}

fn parse_day(value: &str) -> Result<NaiveDate, ValidationError> {
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate)
}

/// Filters for listing events
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub range: DateRange,

    /// Case-insensitive prefix matched against title or type
    pub keyword: Option<String>,
}

impl EventQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = if keyword.trim().is_empty() {
            None
        } else {
            Some(keyword)
        };
        self
    }

    /// Whether `event` belongs in this listing
    ///
    /// The keyword is compared with full Unicode case folding, so `é`
    /// matches `Échéance`.
    pub fn matches(&self, event: &Event) -> bool {
        if !self.range.contains(&event.start) {
            return false;
        }

        match self.keyword.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => {
                let keyword = fold_case(keyword);
                fold_case(&event.title).starts_with(&keyword)
                    || fold_case(&event.event_type).starts_with(&keyword)
            }
            _ => true,
        }
    }
}

/// Lowercase `value` for case-insensitive comparison (Unicode-aware)
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Raw query-string shape for event listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub keyword: Option<String>,
}

impl EventListParams {
    /// Validate and convert into an [`EventQuery`]
    pub fn into_query(self) -> Result<EventQuery, ValidationError> {
        let range = DateRange::from_query(self.start_date.as_deref(), self.end_date.as_deref())?;
        let query = EventQuery::new(range);
        Ok(match self.keyword {
            Some(keyword) => query.with_keyword(keyword),
            None => query,
        })
    }
}
