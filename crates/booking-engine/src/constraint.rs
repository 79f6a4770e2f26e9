//! Scheduling constraints and the validator that checks an event against them.
//!
//! Constraints are a closed set. In JSON they use the `{"type": ..., "params": {...}}`
//! shape, with any omitted parameter falling back to its permissive default:
//!
//! ```json
//! [
//!   {"type": "duration", "params": {"min_minutes": 30, "max_minutes": 120}},
//!   {"type": "time_window", "params": {"start_hour": 9, "end_hour": 17}},
//!   {"type": "no_conflicts", "params": {"existing_events": []}}
//! ]
//! ```
//!
//! A bare `{"type": "duration"}` with no `params` uses all defaults. An
//! unrecognized `type` is a deserialization error rather than a constraint
//! that silently never fires.

use chrono::{Duration, Timelike};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::interval::TimeInterval;

/// Bounds on an event's length, in minutes. `max_minutes: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationLimits {
    pub min_minutes: i64,
    pub max_minutes: Option<i64>,
}

/// Allowed hours of the day for an event's start and end.
///
/// Only the hour component is compared: with `end_hour = 17` an event ending
/// at 17:45 is accepted, one ending at 18:00 is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start_hour: 0,
            end_hour: 24,
        }
    }
}

/// Intervals the event must not overlap, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoConflicts {
    pub existing_events: Vec<TimeInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "params",
    rename_all = "snake_case",
    from = "RawConstraint"
)]
pub enum Constraint {
    Duration(DurationLimits),
    TimeWindow(TimeWindow),
    NoConflicts(NoConflicts),
}

/// Wire shape where `params` may be absent or null.
#[derive(Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
enum RawConstraint {
    Duration(Option<DurationLimits>),
    TimeWindow(Option<TimeWindow>),
    NoConflicts(Option<NoConflicts>),
}

impl From<RawConstraint> for Constraint {
    fn from(raw: RawConstraint) -> Self {
        match raw {
            RawConstraint::Duration(params) => Constraint::Duration(params.unwrap_or_default()),
            RawConstraint::TimeWindow(params) => Constraint::TimeWindow(params.unwrap_or_default()),
            RawConstraint::NoConflicts(params) => {
                Constraint::NoConflicts(params.unwrap_or_default())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Duration,
    TimeWindow,
    NoConflicts,
}

/// A constraint the event failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub constraint: ConstraintKind,
    pub message: String,
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Duration(_) => ConstraintKind::Duration,
            Constraint::TimeWindow(_) => ConstraintKind::TimeWindow,
            Constraint::NoConflicts(_) => ConstraintKind::NoConflicts,
        }
    }

    /// Whether `interval` breaks this constraint.
    pub fn is_violated_by(&self, interval: &TimeInterval) -> bool {
        match self {
            Constraint::Duration(limits) => {
                // A bound too large for `Duration` lies beyond any interval.
                let duration = interval.duration();
                let min = limits.min_minutes;
                let too_short = Duration::try_minutes(min).map_or(min > 0, |min| duration < min);
                let too_long = limits.max_minutes.is_some_and(|max| {
                    Duration::try_minutes(max).map_or(max < 0, |max| duration > max)
                });
                too_short || too_long
            }
            Constraint::TimeWindow(window) => {
                interval.start.hour() < window.start_hour || interval.end.hour() > window.end_hour
            }
            Constraint::NoConflicts(params) => params
                .existing_events
                .iter()
                .any(|other| interval.overlaps(other)),
        }
    }

    fn violation(&self) -> Violation {
        let message = match self {
            Constraint::Duration(_) => "Event duration violates constraint",
            Constraint::TimeWindow(_) => "Event time violates allowed window",
            Constraint::NoConflicts(_) => "Event creates scheduling conflict",
        };
        Violation {
            constraint: self.kind(),
            message: message.to_string(),
        }
    }
}

/// An ordered, append-only set of constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintValidator {
    constraints: Vec<Constraint>,
}

impl ConstraintValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint. Parameters are not checked here.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    /// Check `event` against every constraint, in insertion order.
    ///
    /// All constraints are evaluated; the result holds one violation per failed
    /// constraint and is empty when the event satisfies all of them.
    pub fn validate_event(&self, event: &Event) -> Vec<Violation> {
        self.validate_interval(&event.interval)
    }

    pub fn validate_interval(&self, interval: &TimeInterval) -> Vec<Violation> {
        self.constraints
            .iter()
            .filter(|c| c.is_violated_by(interval))
            .map(Constraint::violation)
            .collect()
    }
}

impl FromIterator<Constraint> for ConstraintValidator {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}
