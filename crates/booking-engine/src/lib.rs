//! # booking-engine
//!
//! Conflict detection, constraint validation, free-slot search and conflict
//! explanations for booking time-bound events.
//!
//! Every function in the engine is pure: it takes the events and constraints
//! it needs as arguments and returns new values. Fetching an owner's events is
//! the caller's job (see [`event::EventStore`]); [`calendar::Calendar`] is an
//! in-memory store that wraps detection and commit in one critical section.
//!
//! ## Quick start
//!
//! ```rust
//! use booking_engine::{detect_conflicts, explain, Event, Severity, TimeInterval};
//!
//! let standup = Event::new(1, 7, "Standup", TimeInterval::new(
//!     "2026-03-02T09:00:00Z".parse().unwrap(),
//!     "2026-03-02T10:00:00Z".parse().unwrap(),
//! ).unwrap());
//! let review = Event::new(2, 7, "Review", TimeInterval::new(
//!     "2026-03-02T09:30:00Z".parse().unwrap(),
//!     "2026-03-02T10:30:00Z".parse().unwrap(),
//! ).unwrap());
//!
//! let conflicts = detect_conflicts(&review, &[standup.clone()]);
//! assert_eq!(conflicts[0].severity, Severity::Medium);
//!
//! let explanation = explain(&review, &conflicts[0], Some(&standup));
//! let details = explanation.detailed().unwrap();
//! assert_eq!(details.overlap_details.overlap_duration_hours, 0.5);
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — Half-open intervals and the overlap primitive
//! - [`event`] — Event records and the `EventStore` contract
//! - [`constraint`] — Duration / time-window / no-conflict rules and their validator
//! - [`detector`] — Per-owner conflict detection and severity grading
//! - [`resolver`] — Structurally validated reschedules
//! - [`slot`] — Earliest free slot within business hours
//! - [`explain`] — Human-readable conflict explanations
//! - [`calendar`] — In-memory store with atomic detect-then-commit
//! - [`error`] — Error types

pub mod calendar;
pub mod constraint;
pub mod detector;
pub mod error;
pub mod event;
pub mod explain;
pub mod interval;
pub mod resolver;
pub mod slot;

pub use calendar::{Booking, Calendar, NewEvent, Rescheduled};
pub use constraint::{Constraint, ConstraintKind, ConstraintValidator, Violation};
pub use detector::{classify_severity, detect_conflicts, Conflict, ConflictType, Severity};
pub use error::EngineError;
pub use event::{Event, EventCategory, EventId, EventStore, OwnerId};
pub use explain::{explain, explain_with, Explanation};
pub use interval::{overlaps, TimeInterval};
pub use resolver::{resolve, Reschedule};
pub use slot::{find_slot, find_slot_from, SlotSearch, DEFAULT_DURATION_MINUTES};
