//! Detect overlapping events for a single owner and grade each collision.
//!
//! Compares one candidate event against the owner's existing events. Adjacent
//! events (where one ends exactly when another starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventId};
use crate::interval::TimeInterval;

/// Overlap below this many seconds is `Low`.
pub const MEDIUM_THRESHOLD_SECS: i64 = 1800;
/// Overlap at or above this many seconds is `High`.
pub const HIGH_THRESHOLD_SECS: i64 = 3600;

/// How badly two events collide, bucketed by overlap length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    #[default]
    TimeOverlap,
}

/// A detected conflict between an event and one of its owner's other events.
///
/// `severity` reflects the intervals at detection time. It is derived data:
/// after either event moves, detect again instead of trusting a stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub event_id: EventId,
    pub conflict_with_event_id: EventId,
    pub conflict_type: ConflictType,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Find every existing event that overlaps `new_event`.
///
/// `existing_events` must already be limited to the same owner and must not
/// contain `new_event` itself (see [`crate::event::others_for_owner`]).
/// One conflict is produced per overlapping event, in input order.
pub fn detect_conflicts(new_event: &Event, existing_events: &[Event]) -> Vec<Conflict> {
    existing_events
        .iter()
        .filter(|existing| new_event.overlaps(existing))
        .map(|existing| Conflict {
            event_id: new_event.id,
            conflict_with_event_id: existing.id,
            conflict_type: ConflictType::TimeOverlap,
            severity: classify_severity(&new_event.interval, &existing.interval),
            resolution: None,
        })
        .collect()
}

/// Grade the overlap between two intervals.
///
/// The overlap is `min(a.end, b.end) - max(a.start, b.start)`:
/// under 30 minutes is `Low`, under an hour is `Medium`, anything longer is
/// `High`. Exactly 1800s is `Medium` and exactly 3600s is `High`.
pub fn classify_severity(a: &TimeInterval, b: &TimeInterval) -> Severity {
    let overlap_end = a.end.min(b.end);
    let overlap_start = a.start.max(b.start);
    severity_for_seconds((overlap_end - overlap_start).num_seconds())
}

/// Step function from overlap seconds to severity.
pub fn severity_for_seconds(overlap_seconds: i64) -> Severity {
    if overlap_seconds < MEDIUM_THRESHOLD_SECS {
        Severity::Low
    } else if overlap_seconds < HIGH_THRESHOLD_SECS {
        Severity::Medium
    } else {
        Severity::High
    }
}
