//! Events as the engine sees them, and the store contract callers provide.

use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

pub type EventId = i64;
pub type OwnerId = i64;

/// Kind of event being booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Conference,
    Hackathon,
    Tournament,
    Workshop,
    #[default]
    Other,
}

/// A booked event.
///
/// The engine reads `id`, `owner_id`, `title` and the interval. The only fields
/// it ever mutates are the interval and `is_tentative` (see [`crate::resolver`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
    /// Serialized inline as `start` / `end`.
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Set when the event was booked while in conflict.
    #[serde(default)]
    pub is_tentative: bool,
}

impl Event {
    /// A minimal event with no description, location or category.
    pub fn new(
        id: EventId,
        owner_id: OwnerId,
        title: impl Into<String>,
        interval: TimeInterval,
    ) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            description: None,
            location: None,
            category: EventCategory::default(),
            interval,
            is_tentative: false,
        }
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        self.interval.overlaps(&other.interval)
    }
}

/// Source of an owner's events.
///
/// Implementations return the owner's events ordered by start time. Nothing in
/// the engine calls this; callers fetch, then pass the slice into the detector,
/// validator or slot finder.
pub trait EventStore {
    fn list_events_for_owner(&self, owner_id: OwnerId) -> Vec<Event>;
}

/// Keep only `owner_id`'s events other than `exclude`, in the order given.
///
/// This is the filtering the detector expects its `existing_events` to have had.
pub fn others_for_owner(events: &[Event], owner_id: OwnerId, exclude: EventId) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.owner_id == owner_id && e.id != exclude)
        .cloned()
        .collect()
}
