//! Read-only collaborators consulted during facet derivation

use chrono::DateTime;
use lifegraph_core::{fields, Attrs, CalendarDay, EntryView, IndexState, Timestamp};

use crate::config::IndexerConfig;

/// Lists the entries on one calendar day.
///
/// Implementations must return ids in a stable order: the implicit visit link
/// picks the first matching candidate.
pub trait DayIndex: Send + Sync {
    fn day_range_entries(&self, state: &IndexState, day: CalendarDay) -> Vec<Timestamp>;
}

/// Answers from the chronological index, ascending by timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDayIndex;

impl DayIndex for ChronoDayIndex {
    fn day_range_entries(&self, state: &IndexState, day: CalendarDay) -> Vec<Timestamp> {
        state.chrono().on_day(day).collect()
    }
}

/// Stay window of a visit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitWindow {
    pub arrival: Timestamp,
    pub departure: Timestamp,
}

impl VisitWindow {
    /// Strict containment: `arrival < ts < departure`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.arrival < ts && ts < self.departure
    }
}

/// Extracts the stay window of a candidate visit entry. Must produce a window
/// even when source fields are missing.
pub trait VisitWindowSource: Send + Sync {
    fn visit_window(&self, attrs: &Attrs) -> VisitWindow;
}

/// Reads `arrival_timestamp` (falling back to `timestamp`) and
/// `departure_timestamp` (falling back to `departure_date`, then to the
/// arrival, which gives an empty window).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldVisitWindow;

impl VisitWindowSource for FieldVisitWindow {
    fn visit_window(&self, attrs: &Attrs) -> VisitWindow {
        let entry = EntryView::new(attrs);
        let arrival = entry
            .int_field(fields::ARRIVAL_TIMESTAMP)
            .or_else(|| entry.timestamp())
            .unwrap_or_default();
        let departure = entry
            .int_field(fields::DEPARTURE_TIMESTAMP)
            .or_else(|| entry.int_field(fields::DEPARTURE_DATE))
            .or_else(|| {
                attrs
                    .get(fields::DEPARTURE_DATE)
                    .and_then(|v| v.as_str())
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.timestamp_millis())
            })
            .unwrap_or(arrival);
        VisitWindow { arrival, departure }
    }
}

/// Sanity bound on timestamp magnitude.
pub trait TimestampGuard: Send + Sync {
    fn is_plausible_timestamp(&self, ts: Timestamp) -> bool;
}

/// Accepts timestamps within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampBounds {
    pub min: Timestamp,
    pub max: Timestamp,
}

impl TimestampGuard for TimestampBounds {
    fn is_plausible_timestamp(&self, ts: Timestamp) -> bool {
        (self.min..=self.max).contains(&ts)
    }
}

/// The full set of collaborators an indexer consults.
pub struct Collaborators {
    pub day_index: Box<dyn DayIndex>,
    pub visits: Box<dyn VisitWindowSource>,
    pub guard: Box<dyn TimestampGuard>,
}

impl Collaborators {
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            day_index: Box::new(ChronoDayIndex),
            visits: Box::new(FieldVisitWindow),
            guard: Box::new(TimestampBounds {
                min: config.plausible_min,
                max: config.plausible_max,
            }),
        }
    }

    pub fn with_day_index(mut self, day_index: impl DayIndex + 'static) -> Self {
        self.day_index = Box::new(day_index);
        self
    }

    pub fn with_visit_windows(mut self, visits: impl VisitWindowSource + 'static) -> Self {
        self.visits = Box::new(visits);
        self
    }

    pub fn with_guard(mut self, guard: impl TimestampGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::from_config(&IndexerConfig::default())
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
