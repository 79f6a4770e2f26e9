//! Error types for booking-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::EventId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An interval whose start is not strictly before its end.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A length in minutes that does not fit in the representable time range.
    #[error("Duration out of range: {0} minutes")]
    DurationOutOfRange(i64),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Duplicate event id: {0}")]
    DuplicateEvent(EventId),

    #[error("No event ids left to assign")]
    IdsExhausted,
}

pub type Result<T> = std::result::Result<T, EngineError>;
