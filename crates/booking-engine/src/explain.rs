//! Human-readable explanations of scheduling conflicts.
//!
//! Given an event, one of its conflicts and the conflicting event, computes the
//! overlap window and produces a recommendation plus a list of remediations.
//! When the conflicting event cannot be found the result is a minimal
//! [`Explanation::Unavailable`] payload, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::{classify_severity, Conflict, ConflictType, Severity};
use crate::event::{Event, EventId};

const UNAVAILABLE: &str = "Could not generate explanation";

/// Remediations offered for every conflict, in order.
pub const GENERIC_ACTIONS: [&str; 3] = [
    "Move one event to a different time slot",
    "Split the overlapping time between events",
    "Postpone lower priority event",
];
/// Offered additionally when both events start on the same calendar date.
pub const DIFFERENT_DAY_ACTION: &str = "Schedule one event on a different day";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapDetails {
    pub overlap_start: DateTime<Utc>,
    pub overlap_end: DateTime<Utc>,
    /// Rounded to two decimal places.
    pub overlap_duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictExplanation {
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub conflicting_event: EventSummary,
    pub overlap_details: OverlapDetails,
    pub recommendation: String,
    pub suggested_actions: Vec<String>,
}

/// Either a full explanation or the degraded payload used when the
/// conflicting event is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Explanation {
    Detailed(ConflictExplanation),
    Unavailable { explanation: String },
}

impl Explanation {
    fn unavailable() -> Self {
        Explanation::Unavailable {
            explanation: UNAVAILABLE.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Explanation::Detailed(_))
    }

    pub fn detailed(&self) -> Option<&ConflictExplanation> {
        match self {
            Explanation::Detailed(details) => Some(details),
            Explanation::Unavailable { .. } => None,
        }
    }
}

/// Explain `conflict` between `event` and `conflicting_event`.
///
/// `conflicting_event` must be the event `conflict.conflict_with_event_id`
/// refers to; `None` or an event with a different id yields
/// [`Explanation::Unavailable`].
///
/// Severity is graded from the events' current intervals rather than copied
/// from `conflict`, so an explanation produced after a reschedule is never
/// stale. Intervals that no longer overlap report a zero-length window.
pub fn explain(
    event: &Event,
    conflict: &Conflict,
    conflicting_event: Option<&Event>,
) -> Explanation {
    let Some(other) = conflicting_event.filter(|o| o.id == conflict.conflict_with_event_id) else {
        return Explanation::unavailable();
    };

    let overlap_start = event.interval.start.max(other.interval.start);
    let overlap_end = event.interval.end.min(other.interval.end).max(overlap_start);
    let overlap_hours = (overlap_end - overlap_start).num_milliseconds() as f64 / 3_600_000.0;
    let severity = classify_severity(&event.interval, &other.interval);

    Explanation::Detailed(ConflictExplanation {
        conflict_type: conflict.conflict_type,
        severity,
        conflicting_event: EventSummary {
            title: other.title.clone(),
            start_time: other.interval.start,
            end_time: other.interval.end,
        },
        overlap_details: OverlapDetails {
            overlap_start,
            overlap_end,
            overlap_duration_hours: round_to_hundredths(overlap_hours),
        },
        recommendation: recommendation(severity, overlap_hours),
        suggested_actions: suggested_actions(event, other),
    })
}

/// [`explain`], resolving the conflicting event through `lookup`.
pub fn explain_with<'a, F>(event: &Event, conflict: &Conflict, lookup: F) -> Explanation
where
    F: FnOnce(EventId) -> Option<&'a Event>,
{
    explain(event, conflict, lookup(conflict.conflict_with_event_id))
}

/// Recommendation text for a severity and overlap length.
pub fn recommendation(severity: Severity, overlap_hours: f64) -> String {
    match severity {
        Severity::Low => "Minor overlap detected. Consider adjusting one event slightly.".to_string(),
        Severity::Medium => format!(
            "Significant overlap of {overlap_hours:.1} hours detected. Recommend rescheduling one event."
        ),
        Severity::High => format!(
            "Major overlap of {overlap_hours:.1} hours detected. One event must be rescheduled."
        ),
    }
}

/// Remediations for a conflict between `a` and `b`.
pub fn suggested_actions(a: &Event, b: &Event) -> Vec<String> {
    let mut actions: Vec<String> = GENERIC_ACTIONS.iter().map(|s| s.to_string()).collect();
    if a.interval.start.date_naive() == b.interval.start.date_naive() {
        actions.push(DIFFERENT_DAY_ACTION.to_string());
    }
    actions
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
