//! Tests for structurally validated reschedules.

use booking_engine::{detect_conflicts, resolve, EngineError, Event, Reschedule, TimeInterval};
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

fn tentative_event() -> Event {
    let mut event = Event::new(
        2,
        1,
        "Review",
        TimeInterval::new(at(9, 30), at(10, 30)).unwrap(),
    );
    event.is_tentative = true;
    event
}

#[test]
fn valid_reschedule_moves_and_confirms() {
    let mut event = tentative_event();

    assert!(resolve(&mut event, at(14, 0), at(15, 0)));

    assert_eq!(event.interval.start, at(14, 0));
    assert_eq!(event.interval.end, at(15, 0));
    assert!(!event.is_tentative);
}

#[test]
fn empty_or_inverted_reschedule_is_rejected_without_mutation() {
    let original = tentative_event();

    let mut event = original.clone();
    assert!(!resolve(&mut event, at(14, 0), at(14, 0)));
    assert_eq!(event, original);

    assert!(!resolve(&mut event, at(15, 0), at(14, 0)));
    assert_eq!(event, original);
}

#[test]
fn reschedule_new_reports_invalid_interval() {
    let err = Reschedule::new(at(15, 0), at(14, 0)).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInterval {
            start: at(15, 0),
            end: at(14, 0),
        }
    );
}

#[test]
fn resolving_does_not_check_for_new_conflicts() {
    let blocker = Event::new(1, 1, "Blocker", TimeInterval::new(at(14, 0), at(16, 0)).unwrap());
    let mut event = tentative_event();

    // Moving straight into another event is still a structurally valid reschedule.
    assert!(resolve(&mut event, at(14, 30), at(15, 30)));
    assert!(!event.is_tentative);

    // Re-running detection afterwards is what surfaces the collision.
    let conflicts = detect_conflicts(&event, &[blocker]);
    assert_eq!(conflicts.len(), 1);
}
