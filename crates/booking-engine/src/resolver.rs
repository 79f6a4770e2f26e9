//! Apply a proposed reschedule to an event.
//!
//! Only structural validity is checked here (`start < end`). Whether the new
//! interval still collides with anything is the detector's job: run
//! [`crate::detect_conflicts`] again after resolving.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::Event;
use crate::interval::TimeInterval;

/// A validated move of an event to a new interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub interval: TimeInterval,
}

impl Reschedule {
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            interval: TimeInterval::new(start, end)?,
        })
    }

    /// Move the event and clear its tentative flag.
    pub fn apply(self, event: &mut Event) {
        event.interval = self.interval;
        event.is_tentative = false;
    }
}

/// Reschedule `event` to `[new_start, new_end)`.
///
/// Returns `false` and leaves the event untouched when `new_start >= new_end`.
/// On success the event is moved and no longer tentative.
pub fn resolve(event: &mut Event, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> bool {
    match Reschedule::new(new_start, new_end) {
        Ok(reschedule) => {
            reschedule.apply(event);
            true
        }
        Err(_) => false,
    }
}
