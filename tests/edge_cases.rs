//! Edge case and boundary condition tests for the display formatter and update window

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Weekday};
use rs_commuter::{
    compute_display, compute_indicators, is_within_update_window, AppState, BatteryAlert,
    ClockStyle, Departure, FaceConfig, ScheduleConfig, Timing, TrainState,
};

fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 9, 3, h, m, s)
        .unwrap()
}

fn trains(times: [i64; 3]) -> TrainState {
    let mut trains = TrainState::default();
    trains.origin = rs_commuter::config::station_code("LST");
    trains.final_destination = rs_commuter::config::station_code("CBG");
    for (departure, t) in trains.departures.iter_mut().zip(times) {
        *departure = Departure {
            scheduled: t,
            cancelled: false,
        };
    }
    trains
}

// ============================================================================
// Giveup boundary
// ============================================================================

#[test]
fn giveup_boundary_is_exclusive() {
    let now = at(9, 0, 0);
    let schedule = ScheduleConfig::default();
    let face = FaceConfig::default();

    // Exactly -99 minutes is still shown
    let t = now.timestamp() - 99 * 60;
    let out = compute_display(&trains([t, 0, 0]), &schedule, &face, &now);
    assert!(!out.abandoned);
    assert!(out.frame.next_train.starts_with("-99 min\n"));
    assert!(out.needs_imminent_update);

    // One more second rounds down to -100
    let out = compute_display(&trains([t - 1, 0, 0]), &schedule, &face, &now);
    assert!(out.abandoned);
    assert!(out.frame.trains_blank());
    assert!(!out.needs_imminent_update);
}

#[test]
fn only_first_train_can_be_abandoned() {
    let now = at(8, 30, 0);
    let t2 = at(6, 0, 0).timestamp();
    let t3 = at(5, 0, 0).timestamp();
    let schedule = ScheduleConfig::default();
    let face = FaceConfig::default();

    for first in [0, at(8, 45, 0).timestamp()] {
        let out = compute_display(&trains([first, t2, t3]), &schedule, &face, &now);
        assert!(!out.abandoned);
        assert!(!out.needs_imminent_update);
        assert!(out.frame.later_trains[0].starts_with("-150 min\n"));
        assert!(out.frame.later_trains[1].starts_with("-210 min\n"));
    }
}

#[test]
fn seconds_are_ignored_when_counting_minutes() {
    let schedule = ScheduleConfig::default();
    let face = FaceConfig::default();
    let t = at(9, 10, 0).timestamp();

    let early = compute_display(&trains([t, 0, 0]), &schedule, &face, &at(9, 0, 1));
    let late = compute_display(&trains([t, 0, 0]), &schedule, &face, &at(9, 0, 59));
    assert_eq!(early.frame.next_train, late.frame.next_train);
    assert!(early.frame.next_train.starts_with("10 min\n"));
}

#[test]
fn partial_minutes_round_down() {
    let schedule = ScheduleConfig::default();
    let face = FaceConfig::default();
    let now = at(9, 0, 0);

    // 30 seconds in the past is -1, not 0
    let out = compute_display(
        &trains([now.timestamp() - 30, 0, 0]),
        &schedule,
        &face,
        &now,
    );
    assert!(out.frame.next_train.starts_with("-1 min\n"));

    // 90 seconds ahead is 1
    let out = compute_display(
        &trains([now.timestamp() + 90, 0, 0]),
        &schedule,
        &face,
        &now,
    );
    assert!(out.frame.next_train.starts_with("1 min\n"));
    assert!(!out.needs_imminent_update);
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn later_trains_and_cancellations() {
    let now = at(8, 0, 0);
    let mut state = trains([
        at(8, 5, 0).timestamp(),
        at(8, 20, 0).timestamp(),
        at(8, 35, 0).timestamp(),
    ]);
    state.departures[2].cancelled = true;

    let out = compute_display(
        &state,
        &ScheduleConfig::default(),
        &FaceConfig::default(),
        &now,
    );
    assert_eq!(out.frame.later_trains[0].as_str(), "20 min\n08:20\n");
    assert_eq!(out.frame.later_trains[1].as_str(), "canc.\n08:35\n");
    assert_eq!(out.frame.cancelled, [false, false, true]);
}

#[test]
fn cancelled_first_train() {
    let now = at(8, 0, 0);
    let mut state = trains([at(8, 5, 0).timestamp(), 0, 0]);
    state.departures[0].cancelled = true;

    let out = compute_display(
        &state,
        &ScheduleConfig::default(),
        &FaceConfig::default(),
        &now,
    );
    assert_eq!(out.frame.next_train.as_str(), "5 min\n08:05\nCancelled");
    assert!(out.frame.cancelled[0]);
}

#[test]
fn missing_departures_leave_blank_columns() {
    let now = at(8, 0, 0);
    let state = trains([at(8, 5, 0).timestamp(), 0, 0]);

    let out = compute_display(
        &state,
        &ScheduleConfig::default(),
        &FaceConfig::default(),
        &now,
    );
    assert!(!out.frame.next_train.is_empty());
    assert!(out.frame.later_trains.iter().all(|t| t.is_empty()));
}

#[test]
fn twelve_hour_clock_everywhere() {
    let now = at(0, 7, 0);
    let schedule = ScheduleConfig::default().with_manual_only(true);
    let face = FaceConfig::default().with_clock_style(ClockStyle::TwelveHour);
    let state = trains([at(13, 5, 0).timestamp(), 0, 0]);

    let out = compute_display(&state, &schedule, &face, &now);
    assert_eq!(out.frame.clock.as_str(), "12:07");
    assert!(out.frame.next_train.contains("\n1:05\n"));
}

#[test]
fn departure_times_follow_display_zone() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 9, 3, 8, 0, 0).unwrap();
    let state = trains([now.timestamp() + 600, 0, 0]);

    let out = compute_display(
        &state,
        &ScheduleConfig::default(),
        &FaceConfig::default(),
        &now,
    );
    assert_eq!(out.frame.clock.as_str(), "08:00");
    assert!(out.frame.next_train.contains("\n08:10\n"));
}

#[test]
fn date_rolls_at_midnight() {
    let schedule = ScheduleConfig::default();
    let face = FaceConfig::default();
    let state = TrainState::default();

    let before = compute_display(&state, &schedule, &face, &at(23, 59, 59));
    let after_tz = FixedOffset::east_opt(0).unwrap();
    let after = after_tz.with_ymd_and_hms(2025, 9, 4, 0, 0, 0).unwrap();
    let after = compute_display(&state, &schedule, &face, &after);

    assert_eq!(before.frame.date.as_str(), "Wednesday\n3 September");
    assert_eq!(after.frame.date.as_str(), "Thursday\n4 September");
}

#[test]
fn overlong_station_codes_are_cut() {
    let mut state = trains([at(8, 5, 0).timestamp(), 0, 0]);
    state.origin = rs_commuter::config::station_code("LONDON");
    assert_eq!(state.origin.as_str(), "LON");

    state.platform = 1234;
    let out = compute_display(
        &state,
        &ScheduleConfig::default(),
        &FaceConfig::default(),
        &at(8, 0, 0),
    );
    assert!(out.frame.next_train.len() <= 30);
}

// ============================================================================
// Indicators
// ============================================================================

#[test]
fn battery_thresholds_are_inclusive() {
    let timing = Timing::default();
    let mut state = AppState::default();

    for (percent, alert) in [
        (100, BatteryAlert::None),
        (21, BatteryAlert::None),
        (20, BatteryAlert::Low),
        (11, BatteryAlert::Low),
        (10, BatteryAlert::Critical),
        (0, BatteryAlert::Critical),
    ] {
        state.device.battery_percent = percent;
        assert_eq!(
            compute_indicators(&state, &timing).battery,
            alert,
            "{percent}%"
        );
    }
}

#[test]
fn clock_offset_threshold() {
    let timing = Timing::default();
    let mut state = AppState::default();

    state.trains.clock_offset_s = 29;
    assert!(compute_indicators(&state, &timing).clock_offset.is_empty());

    state.trains.clock_offset_s = -30;
    assert_eq!(
        compute_indicators(&state, &timing).clock_offset.as_str(),
        "-30"
    );

    state.trains.clock_offset_s = 45;
    assert_eq!(
        compute_indicators(&state, &timing).clock_offset.as_str(),
        "45"
    );
}

// ============================================================================
// Update window
// ============================================================================

fn local(weekday_offset: u32, h: u32, m: u32) -> chrono::NaiveDateTime {
    // 2025-09-01 is a Monday
    NaiveDate::from_ymd_opt(2025, 9, 1 + weekday_offset)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn wrapped_evening_spans_midnight() {
    let schedule = ScheduleConfig::default().with_hours((7, 9), (22, 2));
    assert!(schedule.evening_wraps());

    assert!(!is_within_update_window(&schedule, &local(0, 21, 59)));
    assert!(is_within_update_window(&schedule, &local(0, 22, 0)));
    assert!(is_within_update_window(&schedule, &local(0, 23, 59)));
    assert!(is_within_update_window(&schedule, &local(1, 0, 0)));
    assert!(is_within_update_window(&schedule, &local(1, 1, 59)));
    assert!(!is_within_update_window(&schedule, &local(1, 2, 0)));
}

#[test]
fn window_until_midnight() {
    let schedule = ScheduleConfig::default().with_hours((7, 9), (20, 24));
    assert!(is_within_update_window(&schedule, &local(0, 23, 59)));
    assert!(!is_within_update_window(&schedule, &local(0, 0, 30)));
}

#[test]
fn disabled_day_blocks_every_hour() {
    let mut schedule = ScheduleConfig::default().with_days(&[Weekday::Mon, Weekday::Tue]);
    assert!(is_within_update_window(&schedule, &local(0, 8, 0)));
    assert!(!is_within_update_window(&schedule, &local(2, 8, 0)));

    schedule.set_day_enabled(Weekday::Wed, true);
    assert!(is_within_update_window(&schedule, &local(2, 8, 0)));
}

#[test]
fn manual_only_overrides_day_filter() {
    let schedule = ScheduleConfig::default()
        .with_days(&[Weekday::Mon])
        .with_manual_only(true);
    assert!(is_within_update_window(&schedule, &local(6, 3, 0)));
}
