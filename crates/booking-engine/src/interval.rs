//! Half-open time intervals and the overlap primitive every other module builds on.
//!
//! An interval `[start, end)` contains `start` but not `end`, so two intervals
//! that merely touch (one ends exactly when the other starts) do NOT overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A half-open time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Unchecked wire shape, validated through `TryFrom` on deserialization.
#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when the range is empty or inverted.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval of `minutes` starting at `start`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when `minutes <= 0`, and
    /// `EngineError::DurationOutOfRange` when `start + minutes` is not a
    /// representable instant.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Result<Self> {
        let end = Duration::try_minutes(minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or(EngineError::DurationOutOfRange(minutes))?;
        Self::new(start, end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when the two intervals share at least one instant.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self, other)
    }

    /// The shared window `[max(starts), min(ends))`, or `None` when disjoint.
    pub fn overlap(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

/// Whether two half-open intervals overlap.
///
/// `true` iff NOT (`a.end <= b.start` OR `a.start >= b.end`). Symmetric, and
/// adjacent intervals (`a.end == b.start`) do not overlap.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    !(a.end <= b.start || a.start >= b.end)
}
