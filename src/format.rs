//! Display formatting: watch state + current time → fixed-size text fields.
//!
//! Every field has the capacity of the buffer it is drawn from and writes past
//! that capacity are dropped, never reported.
//!
//! | Field | Capacity | Example |
//! |-------|---------:|---------|
//! | clock | 8 | `09:05` / `9:05` |
//! | date | 22 | `Wednesday\n3 September` |
//! | next train | 30 | `5 min\n08:35\nLST to CBG (4)` |
//! | later trains | 13 | `12 min\n08:42\n` / `canc.\n08:50\n` |
//! | clock offset | 6 | `-45` |
//!
//! Departures are only shown inside the update window. A first departure
//! more than [`Timing::giveup_minutes`] in the past blanks all three columns
//! and marks the output as abandoned, so the caller can forget the stale data.
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use rs_commuter::{format::compute_display, AppState, FaceConfig};
//!
//! let tz = FixedOffset::east_opt(0).unwrap();
//! let now = tz.with_ymd_and_hms(2025, 9, 3, 8, 30, 0).unwrap();
//!
//! let mut state = AppState::default();
//! state.trains.departures[0].scheduled = now.timestamp() + 5 * 60;
//!
//! let out = compute_display(&state.trains, &state.schedule, &FaceConfig::default(), &now);
//! assert_eq!(out.frame.clock.as_str(), "08:30");
//! assert_eq!(out.frame.date.as_str(), "Wednesday\n3 September");
//! assert!(out.frame.next_train.starts_with("5 min\n08:35\n"));
//! ```

use core::fmt::{self, Write};

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use heapless::String as HString;

use crate::config::{ClockStyle, FaceConfig, ScheduleConfig, Timing};
use crate::state::{AppState, Departure, TrainState};
use crate::window::is_within_update_window;

/// Clock field capacity.
pub const CLOCK_CAPACITY: usize = 8;
/// Date field capacity.
pub const DATE_CAPACITY: usize = 22;
/// First departure column capacity.
pub const NEXT_TRAIN_CAPACITY: usize = 30;
/// Second and third departure column capacity.
pub const LATER_TRAIN_CAPACITY: usize = 13;
/// Clock offset indicator capacity.
pub const OFFSET_CAPACITY: usize = 6;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// Truncating writer
// ============================================================================

/// `fmt::Write` adapter that stops at the first character that doesn't fit.
struct Truncating<'a, const N: usize> {
    buf: &'a mut HString<N>,
    full: bool,
}

impl<'a, const N: usize> Truncating<'a, N> {
    fn new(buf: &'a mut HString<N>) -> Self {
        Self { buf, full: false }
    }
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.buf.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// Format into a fixed-capacity string, dropping whatever doesn't fit.
pub fn format_truncated<const N: usize>(args: fmt::Arguments<'_>) -> HString<N> {
    let mut buf = HString::new();
    let _ = Truncating::new(&mut buf).write_fmt(args);
    buf
}

// ============================================================================
// Output types
// ============================================================================

/// The five text regions of the face.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Current time
    pub clock: HString<CLOCK_CAPACITY>,
    /// Weekday, newline, day and month
    pub date: HString<DATE_CAPACITY>,
    /// First departure with route detail
    pub next_train: HString<NEXT_TRAIN_CAPACITY>,
    /// Second and third departures
    pub later_trains: [HString<LATER_TRAIN_CAPACITY>; 2],
    /// Per-column cancelled flag, for renderers that tint cancelled services
    pub cancelled: [bool; 3],
}

impl Frame {
    /// Text of departure column `index` (0..3).
    pub fn train_text(&self, index: usize) -> &str {
        match index {
            0 => self.next_train.as_str(),
            1 | 2 => self.later_trains[index - 1].as_str(),
            _ => "",
        }
    }

    /// Whether all departure columns are empty.
    pub fn trains_blank(&self) -> bool {
        (0..3).all(|i| self.train_text(i).is_empty())
    }
}

/// Result of [`compute_display`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayOutput {
    /// Text to draw
    pub frame: Frame,
    /// The first departure is due now or already left
    pub needs_imminent_update: bool,
    /// The current time is inside the update window
    pub within_window: bool,
    /// The first departure is long gone; tracked departures should be dropped
    pub abandoned: bool,
}

// ============================================================================
// Formatting
// ============================================================================

/// Project the train state and the current time onto the face.
///
/// `now` is read in its own time zone; seconds are ignored.
pub fn compute_display<Tz: TimeZone>(
    trains: &TrainState,
    schedule: &ScheduleConfig,
    face: &FaceConfig,
    now: &DateTime<Tz>,
) -> DisplayOutput {
    let local = now.naive_local();
    let mut out = DisplayOutput {
        within_window: is_within_update_window(schedule, &local),
        ..Default::default()
    };

    out.frame.clock = format_clock(local.hour(), local.minute(), face.clock_style);
    out.frame.date = format_truncated(format_args!(
        "{}\n{} {}",
        WEEKDAY_NAMES[local.weekday().num_days_from_monday() as usize],
        local.day(),
        MONTH_NAMES[local.month0() as usize],
    ));

    if !out.within_window {
        return out;
    }

    let now_s = now.timestamp() - i64::from(local.second());

    let first = trains.next();
    if first.is_set() {
        let diff = minutes_until(first.scheduled, now_s);
        if diff < face.timing.giveup_minutes {
            tracing::info!(diff_minutes = diff, "first departure long gone, abandoning");
            out.abandoned = true;
            return out;
        }
        out.needs_imminent_update = diff <= 0;
        out.frame.next_train = format_next_train(trains, diff, now, face.clock_style);
        out.frame.cancelled[0] = first.cancelled;
    }

    for (slot, departure) in trains.departures[1..].iter().enumerate() {
        if !departure.is_set() {
            continue;
        }
        let diff = minutes_until(departure.scheduled, now_s);
        out.frame.later_trains[slot] = format_later_train(departure, diff, now, face.clock_style);
        out.frame.cancelled[slot + 1] = departure.cancelled;
    }

    out
}

/// Whole minutes from `now_s` until `scheduled`, rounded towards negative infinity.
pub fn minutes_until(scheduled: i64, now_s: i64) -> i64 {
    (scheduled - now_s).div_euclid(60)
}

fn format_clock(hour: u32, minute: u32, style: ClockStyle) -> HString<CLOCK_CAPACITY> {
    let mut buf = HString::new();
    let _ = write_hm(&mut Truncating::new(&mut buf), hour, minute, style);
    buf
}

fn write_hm<W: Write>(w: &mut W, hour: u32, minute: u32, style: ClockStyle) -> fmt::Result {
    match style {
        ClockStyle::TwentyFourHour => write!(w, "{hour:02}:{minute:02}"),
        ClockStyle::TwelveHour => {
            let h = match hour % 12 {
                0 => 12,
                h => h,
            };
            write!(w, "{h}:{minute:02}")
        }
    }
}

/// Departure time in the display time zone.
fn write_departure_time<W: Write, Tz: TimeZone>(
    w: &mut W,
    scheduled: i64,
    now: &DateTime<Tz>,
    style: ClockStyle,
) -> fmt::Result {
    match now.timezone().timestamp_opt(scheduled, 0).single() {
        Some(at) => {
            let at = at.naive_local();
            write_hm(w, at.hour(), at.minute(), style)
        }
        None => w.write_str("--:--"),
    }
}

fn format_next_train<Tz: TimeZone>(
    trains: &TrainState,
    diff: i64,
    now: &DateTime<Tz>,
    style: ClockStyle,
) -> HString<NEXT_TRAIN_CAPACITY> {
    let first = trains.next();
    let mut buf = HString::new();
    let mut w = Truncating::new(&mut buf);

    let _ = writeln!(w, "{diff} min");
    let _ = write_departure_time(&mut w, first.scheduled, now, style);
    let _ = w.write_char('\n');
    if first.cancelled {
        let _ = w.write_str("Cancelled");
    } else {
        let _ = write!(w, "{} to {}", trains.origin, trains.final_destination);
        if trains.platform > 0 {
            let _ = write!(w, " ({})", trains.platform);
        }
    }
    buf
}

fn format_later_train<Tz: TimeZone>(
    departure: &Departure,
    diff: i64,
    now: &DateTime<Tz>,
    style: ClockStyle,
) -> HString<LATER_TRAIN_CAPACITY> {
    let mut buf = HString::new();
    let mut w = Truncating::new(&mut buf);

    if departure.cancelled {
        let _ = w.write_str("canc.\n");
    } else {
        let _ = writeln!(w, "{diff} min");
    }
    let _ = write_departure_time(&mut w, departure.scheduled, now, style);
    let _ = w.write_char('\n');
    buf
}

// ============================================================================
// Indicators
// ============================================================================

/// Battery marker severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatteryAlert {
    /// No marker
    #[default]
    None,
    /// At or below the low threshold
    Low,
    /// At or below the critical threshold
    Critical,
}

impl BatteryAlert {
    /// Classify a battery percentage.
    pub fn from_percent(percent: u8, timing: &Timing) -> Self {
        if percent <= timing.battery_critical_percent {
            Self::Critical
        } else if percent <= timing.battery_low_percent {
            Self::Low
        } else {
            Self::None
        }
    }
}

/// The small status strip at the top of the face.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indicators {
    /// Battery marker
    pub battery: BatteryAlert,
    /// Failure square
    pub request_failed: bool,
    /// Phone clock offset in seconds; empty when below the threshold
    pub clock_offset: HString<OFFSET_CAPACITY>,
}

/// Compute the status strip from the current state.
pub fn compute_indicators(state: &AppState, timing: &Timing) -> Indicators {
    let offset = state.trains.clock_offset_s;
    let clock_offset = if offset.unsigned_abs() >= timing.clock_offset_threshold_s.unsigned_abs() {
        format_truncated(format_args!("{offset}"))
    } else {
        HString::new()
    };

    Indicators {
        battery: BatteryAlert::from_percent(state.device.battery_percent, timing),
        request_failed: state.trains.last_request_failed,
        clock_offset,
    }
}

// ============================================================================
// Tests
// ============================================================================
