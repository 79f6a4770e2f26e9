//! In-memory event store with atomic detect-then-commit.
//!
//! Detection is only meaningful against the events as they are when the new
//! event is written. If two bookings for the same owner both read the event
//! set, both detect "no conflict", and both commit, the slot is double-booked.
//! `Calendar` therefore holds a single lock across the whole
//! read-evaluate-write sequence of every operation.
//!
//! Conflicts are never stored: they are recomputed from the current intervals
//! on each query, so a reschedule can't leave a stale severity behind.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::{detect_conflicts, Conflict};
use crate::error::{EngineError, Result};
use crate::event::{Event, EventCategory, EventId, EventStore, OwnerId};
use crate::explain::{explain, Explanation};
use crate::interval::TimeInterval;
use crate::resolver::Reschedule;
use crate::slot::SlotSearch;

/// An event to be booked; the calendar assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(flatten)]
    pub interval: TimeInterval,
}

impl NewEvent {
    pub fn new(owner_id: OwnerId, title: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            owner_id,
            title: title.into(),
            description: None,
            location: None,
            category: EventCategory::default(),
            interval,
        }
    }
}

/// Result of [`Calendar::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// The stored event, tentative iff `conflicts` is non-empty.
    pub event: Event,
    pub conflicts: Vec<Conflict>,
}

/// Result of [`Calendar::reschedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rescheduled {
    pub event: Event,
    /// Conflicts that held before the move and no longer do, with a resolution note.
    pub resolved: Vec<Conflict>,
    /// Conflicts at the new interval.
    pub remaining: Vec<Conflict>,
}

#[derive(Debug)]
struct CalendarState {
    events: BTreeMap<EventId, Event>,
    /// `None` once `EventId::MAX` has been handed out or seeded.
    next_id: Option<EventId>,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl CalendarState {
    fn event(&self, id: EventId) -> Result<&Event> {
        self.events.get(&id).ok_or(EngineError::EventNotFound(id))
    }

    /// `owner_id`'s events except `exclude`, ordered by start.
    fn others(&self, owner_id: OwnerId, exclude: Option<EventId>) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .values()
            .filter(|e| e.owner_id == owner_id && Some(e.id) != exclude)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.interval.start, e.id));
        events
    }

    fn conflicts_for(&self, id: EventId) -> Result<Vec<Conflict>> {
        let event = self.event(id)?;
        let others = self.others(event.owner_id, Some(id));
        Ok(detect_conflicts(event, &others))
    }
}

/// A thread-safe, in-memory calendar for many owners.
#[derive(Debug, Default)]
pub struct Calendar {
    state: Mutex<CalendarState>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a calendar with existing events, keeping their ids. New events are
    /// numbered after the largest seeded id.
    ///
    /// # Errors
    /// `DuplicateEvent` when two events share an id.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Result<Self> {
        let mut state = CalendarState::default();
        let mut max_id = None;
        for event in events {
            let id = event.id;
            if state.events.insert(id, event).is_some() {
                return Err(EngineError::DuplicateEvent(id));
            }
            max_id = max_id.max(Some(id));
        }
        if let Some(max_id) = max_id {
            state.next_id = max_id.checked_add(1).map(|next| next.max(1));
        }
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    // State is only mutated after every fallible step, so a poisoned lock
    // still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, CalendarState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Book an event, marking it tentative when it collides with any of the
    /// owner's existing events.
    ///
    /// # Errors
    /// `IdsExhausted` once `EventId::MAX` is taken.
    pub fn create(&self, new_event: NewEvent) -> Result<Booking> {
        let mut state = self.lock();

        let id = state.next_id.ok_or(EngineError::IdsExhausted)?;
        let mut event = Event {
            id,
            owner_id: new_event.owner_id,
            title: new_event.title,
            description: new_event.description,
            location: new_event.location,
            category: new_event.category,
            interval: new_event.interval,
            is_tentative: false,
        };

        let others = state.others(event.owner_id, None);
        let conflicts = detect_conflicts(&event, &others);
        event.is_tentative = !conflicts.is_empty();

        state.next_id = id.checked_add(1);
        state.events.insert(id, event.clone());

        Ok(Booking { event, conflicts })
    }

    /// Move an event to `[start, end)` and re-run detection.
    ///
    /// # Errors
    /// `InvalidInterval` when `start >= end`, `EventNotFound` for an unknown id.
    /// The event is left unchanged in both cases.
    pub fn reschedule(
        &self,
        id: EventId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Rescheduled> {
        let reschedule = Reschedule::new(start, end)?;
        let mut state = self.lock();

        let before = state.conflicts_for(id)?;

        let mut event = state.event(id)?.clone();
        reschedule.apply(&mut event);
        let others = state.others(event.owner_id, Some(id));
        let remaining = detect_conflicts(&event, &others);
        event.is_tentative = !remaining.is_empty();

        let note = format!(
            "Resolved by rescheduling to {} - {}",
            start.to_rfc3339(),
            end.to_rfc3339()
        );
        let resolved = before
            .into_iter()
            .filter(|c| {
                !remaining
                    .iter()
                    .any(|r| r.conflict_with_event_id == c.conflict_with_event_id)
            })
            .map(|c| Conflict {
                resolution: Some(note.clone()),
                ..c
            })
            .collect();

        state.events.insert(id, event.clone());

        Ok(Rescheduled {
            event,
            resolved,
            remaining,
        })
    }

    /// # Errors
    /// `EventNotFound` for an unknown id.
    pub fn delete(&self, id: EventId) -> Result<Event> {
        self.lock()
            .events
            .remove(&id)
            .ok_or(EngineError::EventNotFound(id))
    }

    pub fn get(&self, id: EventId) -> Option<Event> {
        self.lock().events.get(&id).cloned()
    }

    /// Every event owned by `owner_id`, ordered by start.
    pub fn list_for_owner(&self, owner_id: OwnerId) -> Vec<Event> {
        self.lock().others(owner_id, None)
    }

    /// Current conflicts of an event against the rest of its owner's calendar.
    ///
    /// # Errors
    /// `EventNotFound` for an unknown id.
    pub fn conflicts_for(&self, id: EventId) -> Result<Vec<Conflict>> {
        self.lock().conflicts_for(id)
    }

    /// Explain one of an event's conflicts. A conflicting event that has since
    /// been deleted produces the degraded explanation.
    ///
    /// # Errors
    /// `EventNotFound` when `id` itself is unknown.
    pub fn explain(&self, id: EventId, conflict: &Conflict) -> Result<Explanation> {
        let state = self.lock();
        let event = state.event(id)?;
        Ok(explain(
            event,
            conflict,
            state.events.get(&conflict.conflict_with_event_id),
        ))
    }

    /// Explain every current conflict of an event.
    ///
    /// # Errors
    /// `EventNotFound` for an unknown id.
    pub fn explain_conflicts(&self, id: EventId) -> Result<Vec<Explanation>> {
        let state = self.lock();
        let event = state.event(id)?;
        Ok(state
            .conflicts_for(id)?
            .iter()
            .map(|c| explain(event, c, state.events.get(&c.conflict_with_event_id)))
            .collect())
    }

    /// Earliest free slot for an owner under `search`.
    pub fn find_slot_for_owner(
        &self,
        owner_id: OwnerId,
        duration_minutes: i64,
        now: DateTime<Utc>,
        search: &SlotSearch,
    ) -> Option<TimeInterval> {
        let events = self.list_for_owner(owner_id);
        search.find(&events, duration_minutes, now)
    }
}

impl EventStore for Calendar {
    fn list_events_for_owner(&self, owner_id: OwnerId) -> Vec<Event> {
        self.list_for_owner(owner_id)
    }
}
