//! Errors surfaced by the indexing core

use thiserror::Error;

use crate::model::Timestamp;

/// Conditions that abort indexing of a single entry.
///
/// Everything else (missing optional fields, dangling link targets, absent
/// visits) is absorbed as a no-op or a logged skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The timestamp cannot be placed on the calendar.
    #[error("invalid timestamp {0}: outside the representable calendar range")]
    InvalidTimestamp(Timestamp),

    /// An entry was submitted without an integer `timestamp` field.
    #[error("entry has no integer `timestamp` field")]
    MissingTimestamp,
}
