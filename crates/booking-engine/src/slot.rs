//! Find the earliest free slot for an owner within business hours.
//!
//! This is a greedy linear scan, not a packing search: candidates are tried
//! day by day, hour by hour, and the first one that collides with nothing wins.
//! Callers that need to place several events at once must layer that on top.

use chrono::{DateTime, Days, Utc};

use crate::event::Event;
use crate::interval::TimeInterval;

/// Length of a slot when the caller does not ask for one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Bounds of the slot search.
///
/// The default is the booking policy: 30 days ahead, slots starting on the hour
/// from 09:00 through 17:00. `last_start_hour` bounds the start only, so a
/// two-hour slot may start at 17:00 and end at 19:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSearch {
    pub horizon_days: u32,
    pub first_start_hour: u32,
    pub last_start_hour: u32,
}

impl Default for SlotSearch {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            first_start_hour: 9,
            last_start_hour: 17,
        }
    }
}

impl SlotSearch {
    /// Earliest `[start, start + duration_minutes)` free of every event in `events`.
    ///
    /// Days run from the calendar date of `now`; within a day, start hours run
    /// from `first_start_hour` to `last_start_hour` inclusive. Candidates that
    /// start before `now` are skipped. Returns `None` when the horizon is
    /// exhausted or `duration_minutes` is not positive.
    pub fn find(
        &self,
        events: &[Event],
        duration_minutes: i64,
        now: DateTime<Utc>,
    ) -> Option<TimeInterval> {
        if duration_minutes <= 0 {
            return None;
        }
        let today = now.date_naive();

        for day_offset in 0..self.horizon_days {
            let date = today.checked_add_days(Days::new(u64::from(day_offset)))?;

            for hour in self.first_start_hour..=self.last_start_hour {
                let Some(start) = date.and_hms_opt(hour, 0, 0).map(|naive| naive.and_utc()) else {
                    continue;
                };
                if start < now {
                    continue;
                }
                let candidate = TimeInterval::starting_at(start, duration_minutes).ok()?;

                if !events.iter().any(|e| e.interval.overlaps(&candidate)) {
                    return Some(candidate);
                }
            }
        }

        None
    }
}

/// Earliest free slot of `duration_minutes` from now, using the default search.
pub fn find_slot(owner_events: &[Event], duration_minutes: i64) -> Option<TimeInterval> {
    find_slot_from(owner_events, duration_minutes, Utc::now())
}

/// Like [`find_slot`], searching from an explicit instant.
pub fn find_slot_from(
    owner_events: &[Event],
    duration_minutes: i64,
    now: DateTime<Utc>,
) -> Option<TimeInterval> {
    SlotSearch::default().find(owner_events, duration_minutes, now)
}
