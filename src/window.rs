//! Update-window policy: may the watch ask the phone for fresh departures now?
//!
//! The decision is a pure function of the [`ScheduleConfig`] and the local
//! wall-clock time, checked in this order:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | manual-only mode | `true` |
//! | custom days and today disabled | `false` |
//! | hour in `[morning_start, morning_end)` | `true` |
//! | hour in the evening window (may wrap past midnight) | `true` |
//! | otherwise | `false` |
//!
//! Manual-only mode answers `true` because the user explicitly asked for data;
//! the scheduler never calls in for automatic refreshes in that mode.

use chrono::{Datelike, Timelike};

use crate::config::ScheduleConfig;

/// Whether an update request is allowed at local time `now`.
///
/// ```
/// use chrono::NaiveDate;
/// use rs_commuter::{config::ScheduleConfig, window::is_within_update_window};
///
/// // Wednesday 3 September 2025
/// let date = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
/// let schedule = ScheduleConfig::default();
///
/// assert!(is_within_update_window(&schedule, &date.and_hms_opt(8, 30, 0).unwrap()));
/// assert!(!is_within_update_window(&schedule, &date.and_hms_opt(12, 0, 0).unwrap()));
/// ```
pub fn is_within_update_window<T>(config: &ScheduleConfig, now: &T) -> bool
where
    T: Datelike + Timelike,
{
    if config.manual_only {
        return true;
    }

    if config.use_custom_days && !config.day_enabled(now.weekday()) {
        return false;
    }

    let hour = now.hour();
    in_range(hour, config.morning_start, config.morning_end)
        || in_evening(hour, config.evening_start, config.evening_end)
}

fn in_range(hour: u32, start: u8, end: u8) -> bool {
    hour >= u32::from(start) && hour < u32::from(end)
}

fn in_evening(hour: u32, start: u8, end: u8) -> bool {
    if end >= start {
        in_range(hour, start, end)
    } else {
        hour >= u32::from(start) || hour < u32::from(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, Weekday};

    // 2025-09-01 is a Monday
    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    // =========================================================================
    // Hour windows
    // =========================================================================

    #[test]
    fn default_windows() {
        let schedule = ScheduleConfig::default();
        let expected: [bool; 24] =
            core::array::from_fn(|h| (7..11).contains(&h) || (16..20).contains(&h));
        for (hour, want) in expected.iter().enumerate() {
            assert_eq!(
                is_within_update_window(&schedule, &at(1, hour as u32)),
                *want,
                "hour {hour}"
            );
        }
    }

    #[test]
    fn window_end_is_exclusive() {
        let schedule = ScheduleConfig::default();
        assert!(is_within_update_window(&schedule, &at(1, 10)));
        assert!(!is_within_update_window(&schedule, &at(1, 11)));
        assert!(is_within_update_window(&schedule, &at(1, 19)));
        assert!(!is_within_update_window(&schedule, &at(1, 20)));
    }

    #[test]
    fn evening_wraps_past_midnight() {
        let schedule = ScheduleConfig::default().with_hours((7, 11), (22, 2));
        assert!(is_within_update_window(&schedule, &at(1, 23)));
        assert!(is_within_update_window(&schedule, &at(1, 1)));
        assert!(!is_within_update_window(&schedule, &at(1, 2)));
        assert!(!is_within_update_window(&schedule, &at(1, 21)));
    }

    #[test]
    fn empty_windows_never_match() {
        let schedule = ScheduleConfig::default().with_hours((9, 9), (18, 18));
        for hour in 0..24 {
            assert!(!is_within_update_window(&schedule, &at(1, hour)));
        }
    }

    // =========================================================================
    // Day filter and manual mode
    // =========================================================================

    #[test]
    fn disabled_day_blocks_updates() {
        let schedule = ScheduleConfig::default().with_days(&[Weekday::Mon, Weekday::Tue]);
        assert!(is_within_update_window(&schedule, &at(1, 8)));
        // Wednesday
        assert!(!is_within_update_window(&schedule, &at(3, 8)));
    }

    #[test]
    fn day_flags_ignored_without_custom_days() {
        let mut schedule = ScheduleConfig::default();
        schedule.enabled_days = [false; 7];
        assert!(is_within_update_window(&schedule, &at(3, 8)));
    }

    #[test]
    fn manual_only_always_allows() {
        let schedule = ScheduleConfig::default()
            .with_days(&[])
            .with_manual_only(true);
        assert!(is_within_update_window(&schedule, &at(3, 3)));
        assert!(is_within_update_window(&schedule, &at(6, 13)));
    }
}
