//! Tests for constraint validation.

use booking_engine::constraint::{DurationLimits, NoConflicts, TimeWindow};
use booking_engine::{Constraint, ConstraintKind, ConstraintValidator, Event, TimeInterval};
use chrono::{Duration, TimeZone, Utc};

fn event_at(hour: u32, minute: u32, minutes: i64) -> Event {
    let start = Utc.with_ymd_and_hms(2026, 4, 6, hour, minute, 0).unwrap();
    Event::new(
        1,
        1,
        "Workshop",
        TimeInterval::new(start, start + Duration::minutes(minutes)).unwrap(),
    )
}

fn kinds(validator: &ConstraintValidator, event: &Event) -> Vec<ConstraintKind> {
    validator
        .validate_event(event)
        .into_iter()
        .map(|v| v.constraint)
        .collect()
}

// ── Duration ────────────────────────────────────────────────────────────────

#[test]
fn duration_flags_too_short_and_too_long() {
    let mut validator = ConstraintValidator::new();
    validator.add_constraint(Constraint::Duration(DurationLimits {
        min_minutes: 30,
        max_minutes: Some(120),
    }));

    let short = validator.validate_event(&event_at(10, 0, 20));
    assert_eq!(short.len(), 1);
    assert_eq!(short[0].constraint, ConstraintKind::Duration);
    assert_eq!(short[0].message, "Event duration violates constraint");

    assert_eq!(validator.validate_event(&event_at(10, 0, 150)).len(), 1);
    assert!(validator.validate_event(&event_at(10, 0, 60)).is_empty());
}

#[test]
fn duration_bounds_are_inclusive() {
    let validator: ConstraintValidator = [Constraint::Duration(DurationLimits {
        min_minutes: 30,
        max_minutes: Some(120),
    })]
    .into_iter()
    .collect();

    assert!(validator.validate_event(&event_at(10, 0, 30)).is_empty());
    assert!(validator.validate_event(&event_at(10, 0, 120)).is_empty());
}

#[test]
fn duration_without_max_is_unbounded() {
    let validator: ConstraintValidator = [Constraint::Duration(DurationLimits::default())]
        .into_iter()
        .collect();

    // Eight hours: no maximum, default minimum of zero.
    assert!(validator.validate_event(&event_at(8, 0, 480)).is_empty());
}

#[test]
fn out_of_range_duration_bounds_do_not_panic() {
    let event = event_at(10, 0, 60);

    // Upper bounds past anything an interval can span never fire.
    let unbounded: ConstraintValidator = serde_json::from_str(
        r#"[{"type": "duration", "params": {"min_minutes": 30, "max_minutes": 9223372036854775807}}]"#,
    )
    .unwrap();
    assert!(unbounded.validate_event(&event).is_empty());

    let lowest_min: ConstraintValidator = [Constraint::Duration(DurationLimits {
        min_minutes: i64::MIN,
        max_minutes: None,
    })]
    .into_iter()
    .collect();
    assert!(lowest_min.validate_event(&event).is_empty());

    // Bounds that no interval can satisfy always fire.
    for limits in [
        DurationLimits {
            min_minutes: i64::MAX,
            max_minutes: None,
        },
        DurationLimits {
            min_minutes: 0,
            max_minutes: Some(i64::MIN),
        },
    ] {
        let validator: ConstraintValidator = [Constraint::Duration(limits)].into_iter().collect();
        assert_eq!(kinds(&validator, &event), vec![ConstraintKind::Duration]);
    }
}

// ── Time window ─────────────────────────────────────────────────────────────

#[test]
fn time_window_flags_early_start() {
    let validator: ConstraintValidator = [Constraint::TimeWindow(TimeWindow {
        start_hour: 9,
        end_hour: 17,
    })]
    .into_iter()
    .collect();

    let violations = validator.validate_event(&event_at(8, 0, 60));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].constraint, ConstraintKind::TimeWindow);
    assert_eq!(violations[0].message, "Event time violates allowed window");
}

#[test]
fn time_window_accepts_full_business_day() {
    let validator: ConstraintValidator = [Constraint::TimeWindow(TimeWindow {
        start_hour: 9,
        end_hour: 17,
    })]
    .into_iter()
    .collect();

    // 09:00-17:00
    assert!(validator.validate_event(&event_at(9, 0, 480)).is_empty());
}

#[test]
fn time_window_compares_hours_only() {
    let validator: ConstraintValidator = [Constraint::TimeWindow(TimeWindow {
        start_hour: 9,
        end_hour: 17,
    })]
    .into_iter()
    .collect();

    // Ends 17:45: hour 17 is not later than 17.
    assert!(validator.validate_event(&event_at(16, 0, 105)).is_empty());
    // Ends 18:00: hour 18 is.
    assert_eq!(validator.validate_event(&event_at(16, 0, 120)).len(), 1);
    // Starts 08:59: hour 8 is earlier than 9.
    assert_eq!(validator.validate_event(&event_at(8, 59, 30)).len(), 1);
}

// ── No conflicts ────────────────────────────────────────────────────────────

#[test]
fn no_conflicts_checks_supplied_events_only() {
    let busy = event_at(10, 0, 60).interval;
    let validator: ConstraintValidator = [Constraint::NoConflicts(NoConflicts {
        existing_events: vec![busy],
    })]
    .into_iter()
    .collect();

    let violations = validator.validate_event(&event_at(10, 30, 60));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].constraint, ConstraintKind::NoConflicts);
    assert_eq!(violations[0].message, "Event creates scheduling conflict");

    // Touching is not overlapping.
    assert!(validator.validate_event(&event_at(11, 0, 60)).is_empty());
}

#[test]
fn no_conflicts_with_empty_set_passes() {
    let validator: ConstraintValidator = [Constraint::NoConflicts(NoConflicts::default())]
        .into_iter()
        .collect();
    assert!(validator.validate_event(&event_at(10, 0, 60)).is_empty());
}

// ── Validator behaviour ─────────────────────────────────────────────────────

#[test]
fn every_constraint_evaluated_in_insertion_order() {
    let mut validator = ConstraintValidator::new();
    validator.add_constraint(Constraint::TimeWindow(TimeWindow {
        start_hour: 9,
        end_hour: 17,
    }));
    validator.add_constraint(Constraint::NoConflicts(NoConflicts {
        existing_events: vec![event_at(7, 0, 120).interval],
    }));
    validator.add_constraint(Constraint::Duration(DurationLimits {
        min_minutes: 0,
        max_minutes: Some(30),
    }));

    // 07:30-08:30 breaks all three.
    assert_eq!(
        kinds(&validator, &event_at(7, 30, 60)),
        vec![
            ConstraintKind::TimeWindow,
            ConstraintKind::NoConflicts,
            ConstraintKind::Duration
        ]
    );
}

#[test]
fn duplicate_constraints_each_report() {
    let limits = Constraint::Duration(DurationLimits {
        min_minutes: 90,
        max_minutes: None,
    });
    let validator: ConstraintValidator = [limits.clone(), limits].into_iter().collect();
    assert_eq!(validator.validate_event(&event_at(10, 0, 60)).len(), 2);
}

#[test]
fn empty_validator_accepts_everything() {
    assert!(ConstraintValidator::new()
        .validate_event(&event_at(3, 0, 1000))
        .is_empty());
}

// ── JSON shape ──────────────────────────────────────────────────────────────

#[test]
fn constraints_parse_from_tagged_json_with_defaults() {
    let json = r#"[
        {"type": "duration", "params": {"min_minutes": 30}},
        {"type": "time_window", "params": {}},
        {"type": "no_conflicts", "params": {"existing_events": [
            {"start": "2026-04-06T10:00:00Z", "end": "2026-04-06T11:00:00Z"}
        ]}}
    ]"#;

    let validator: ConstraintValidator = serde_json::from_str(json).unwrap();
    let constraints = validator.constraints();

    assert_eq!(
        constraints[0],
        Constraint::Duration(DurationLimits {
            min_minutes: 30,
            max_minutes: None,
        })
    );
    assert_eq!(
        constraints[1],
        Constraint::TimeWindow(TimeWindow {
            start_hour: 0,
            end_hour: 24,
        })
    );
    match &constraints[2] {
        Constraint::NoConflicts(params) => assert_eq!(params.existing_events.len(), 1),
        other => panic!("expected no_conflicts, got {other:?}"),
    }
}

#[test]
fn unknown_constraint_type_is_rejected() {
    let json = r#"[{"type": "max_attendees", "params": {"limit": 10}}]"#;
    assert!(serde_json::from_str::<ConstraintValidator>(json).is_err());
}

#[test]
fn missing_params_fall_back_to_defaults() {
    let json = r#"[
        {"type": "duration"},
        {"type": "time_window", "params": null},
        {"type": "no_conflicts"}
    ]"#;

    let validator: ConstraintValidator = serde_json::from_str(json).unwrap();

    assert_eq!(
        validator.constraints(),
        &[
            Constraint::Duration(DurationLimits::default()),
            Constraint::TimeWindow(TimeWindow::default()),
            Constraint::NoConflicts(NoConflicts::default()),
        ]
    );
    assert!(validator.validate_event(&event_at(3, 0, 1000)).is_empty());
}

#[test]
fn constraints_serialize_with_params() {
    let json = serde_json::to_value(Constraint::Duration(DurationLimits::default())).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"type": "duration", "params": {"min_minutes": 0, "max_minutes": null}})
    );
}
