//! Calendar days derived from entry timestamps (UTC)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::model::{NodeKey, Timestamp};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// One UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDay)
    }

    /// Day on which `ts` (milliseconds since epoch, UTC) falls.
    pub fn from_timestamp(ts: Timestamp) -> Result<Self, IndexError> {
        DateTime::from_timestamp_millis(ts)
            .map(|dt| CalendarDay(dt.date_naive()))
            .ok_or(IndexError::InvalidTimestamp(ts))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Half-open millisecond range `[start, end)` covered by this day.
    pub fn bounds(&self) -> (Timestamp, Timestamp) {
        let start = self.0.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        (start, start + MILLIS_PER_DAY)
    }

    pub fn year_key(&self) -> NodeKey {
        NodeKey::Year(self.year())
    }

    pub fn month_key(&self) -> NodeKey {
        NodeKey::Month {
            year: self.year(),
            month: self.month(),
        }
    }

    pub fn day_key(&self) -> NodeKey {
        NodeKey::Day(*self)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(CalendarDay)
    }
}
