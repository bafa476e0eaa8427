//! Sorted mirror of which entry timestamps exist

use std::collections::BTreeSet;
use std::ops::RangeBounds;

use crate::calendar::CalendarDay;
use crate::model::Timestamp;

/// Ordered set of entry timestamps, for range and ordered iteration without
/// walking the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChronoIndex {
    timestamps: BTreeSet<Timestamp>,
}

impl ChronoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the timestamp was already present.
    pub fn insert(&mut self, ts: Timestamp) -> bool {
        self.timestamps.insert(ts)
    }

    /// Returns `false` if the timestamp was not present.
    pub fn remove(&mut self, ts: Timestamp) -> bool {
        self.timestamps.remove(&ts)
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.timestamps.contains(&ts)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Timestamp> + '_ {
        self.timestamps.iter().copied()
    }

    /// Ascending iteration over a timestamp range.
    pub fn range<R>(&self, range: R) -> impl DoubleEndedIterator<Item = Timestamp> + '_
    where
        R: RangeBounds<Timestamp>,
    {
        self.timestamps.range(range).copied()
    }

    /// Timestamps falling on one calendar day, ascending.
    pub fn on_day(&self, day: CalendarDay) -> impl DoubleEndedIterator<Item = Timestamp> + '_ {
        let (start, end) = day.bounds();
        self.range(start..end)
    }

    /// The `n` most recent timestamps, newest first.
    pub fn latest(&self, n: usize) -> Vec<Timestamp> {
        self.timestamps.iter().rev().take(n).copied().collect()
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.timestamps.first().copied()
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.timestamps.last().copied()
    }
}
