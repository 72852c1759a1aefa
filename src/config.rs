//! Configuration for the watch face, its update schedule and the phone link.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! Two kinds of configuration live here:
//!
//! - [`ScheduleConfig`] is owned by the phone app. It arrives inside inbound
//!   messages and is overwritten field by field (see [`crate::messages`]).
//! - [`FaceConfig`] and [`LinkConfig`] are fixed at startup by whoever builds
//!   the [`WatchFace`](crate::WatchFace).
//!
//! # Example
//!
//! ```rust
//! use rs_commuter::config::{ClockStyle, Config, FaceConfig, LinkConfig, Timing};
//!
//! let config = Config::default()
//!     .with_face(
//!         FaceConfig::default()
//!             .with_clock_style(ClockStyle::TwelveHour)
//!             .with_timing(Timing::default().with_update_period_minutes(10)),
//!     )
//!     .with_link(LinkConfig::default().with_host("192.168.1.100"));
//!
//! assert_eq!(config.face.timing.update_period_minutes, 10);
//! assert_eq!(config.link.host.as_str(), "192.168.1.100");
//! ```

use chrono::Weekday;
use heapless::String as HString;

/// Length of a CRS station code ("LST", "CBG", ...).
pub const STATION_CODE_LEN: usize = 3;

/// Maximum length for link strings (hostnames, client IDs, topic prefixes)
pub const MAX_LINK_STRING: usize = 64;

/// A station code, truncated to [`STATION_CODE_LEN`] characters.
pub type StationCode = HString<STATION_CODE_LEN>;

/// Type alias for link config strings
pub type LinkString = HString<MAX_LINK_STRING>;

/// Default first hour of the morning update window.
pub const DEFAULT_MORNING_START: u8 = 7;
/// Default end (exclusive) of the morning update window.
pub const DEFAULT_MORNING_END: u8 = 11;
/// Default first hour of the evening update window.
pub const DEFAULT_EVENING_START: u8 = 16;
/// Default end (exclusive) of the evening update window.
pub const DEFAULT_EVENING_END: u8 = 20;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a fixed-capacity string from a `&str`, truncating if too long.
///
/// Truncation always lands on a UTF-8 character boundary.
///
/// ```
/// use rs_commuter::config::truncated;
///
/// let code: heapless::String<3> = truncated("KGX London");
/// assert_eq!(code.as_str(), "KGX");
/// ```
pub fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    let valid_end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= N)
        .last()
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

/// Create a [`StationCode`], truncating anything past three characters.
pub fn station_code(s: &str) -> StationCode {
    truncated(s)
}

/// Create a [`LinkString`], truncating if too long.
pub fn link_string(s: &str) -> LinkString {
    truncated(s)
}

// ============================================================================
// Schedule Config
// ============================================================================

/// Days and hours during which automatic refreshes are allowed.
///
/// Hours are 24 h clock values. The evening window may wrap past midnight:
/// `evening_end < evening_start` means "from `evening_start` until
/// `evening_end` the next morning".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleConfig {
    /// Restrict updates to the days flagged in `enabled_days`.
    pub use_custom_days: bool,
    /// Per-weekday enable flags, indexed from Sunday (0) to Saturday (6).
    pub enabled_days: [bool; 7],
    /// Whether the phone asserted its own update hours.
    pub use_custom_hours: bool,
    /// First hour of the morning window.
    pub morning_start: u8,
    /// End of the morning window (exclusive).
    pub morning_end: u8,
    /// First hour of the evening window.
    pub evening_start: u8,
    /// End of the evening window (exclusive, may wrap past midnight).
    pub evening_end: u8,
    /// Only refresh on an explicit gesture.
    pub manual_only: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            use_custom_days: false,
            enabled_days: [true; 7],
            use_custom_hours: false,
            morning_start: DEFAULT_MORNING_START,
            morning_end: DEFAULT_MORNING_END,
            evening_start: DEFAULT_EVENING_START,
            evening_end: DEFAULT_EVENING_END,
            manual_only: false,
        }
    }
}

impl ScheduleConfig {
    /// Whether updates are enabled on the given weekday.
    ///
    /// Only consulted when `use_custom_days` is set.
    pub fn day_enabled(&self, day: Weekday) -> bool {
        self.enabled_days[day.num_days_from_sunday() as usize]
    }

    /// Enable or disable updates on one weekday.
    pub fn set_day_enabled(&mut self, day: Weekday, enabled: bool) {
        self.enabled_days[day.num_days_from_sunday() as usize] = enabled;
    }

    /// Put the four window hours back to 7–11 and 16–20.
    pub fn reset_hours(&mut self) {
        self.morning_start = DEFAULT_MORNING_START;
        self.morning_end = DEFAULT_MORNING_END;
        self.evening_start = DEFAULT_EVENING_START;
        self.evening_end = DEFAULT_EVENING_END;
    }

    /// Restrict updates to the listed weekdays
    pub fn with_days(mut self, days: &[Weekday]) -> Self {
        self.use_custom_days = true;
        self.enabled_days = [false; 7];
        for day in days {
            self.set_day_enabled(*day, true);
        }
        self
    }

    /// Use custom morning and evening windows
    pub fn with_hours(mut self, morning: (u8, u8), evening: (u8, u8)) -> Self {
        self.use_custom_hours = true;
        self.morning_start = morning.0;
        self.morning_end = morning.1;
        self.evening_start = evening.0;
        self.evening_end = evening.1;
        self
    }

    /// Set manual-only mode
    pub fn with_manual_only(mut self, manual_only: bool) -> Self {
        self.manual_only = manual_only;
        self
    }

    /// Whether the evening window runs past midnight.
    pub fn evening_wraps(&self) -> bool {
        self.evening_end < self.evening_start
    }
}

// ============================================================================
// Face Config
// ============================================================================

/// How the clock and departure times are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClockStyle {
    /// `09:05`, `17:40`
    #[default]
    TwentyFourHour,
    /// `9:05`, `5:40`
    TwelveHour,
}

/// Scheduling and display constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    /// Delay between the first render and the startup refresh request.
    pub initial_update_delay_ms: u32,
    /// How long tapped-in data stays on screen in manual-only mode.
    pub drop_stale_delay_ms: u32,
    /// Periodic refresh cadence; a request goes out on every minute divisible by this.
    pub update_period_minutes: u32,
    /// A next departure further in the past than this (in minutes) is abandoned.
    pub giveup_minutes: i64,
    /// Smallest phone/watch clock difference worth showing, in seconds.
    pub clock_offset_threshold_s: i32,
    /// Battery at or below this percentage draws the critical marker.
    pub battery_critical_percent: u8,
    /// Battery at or below this percentage draws the low marker.
    pub battery_low_percent: u8,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            initial_update_delay_ms: 3_000,
            drop_stale_delay_ms: 60_000,
            update_period_minutes: 15,
            giveup_minutes: -99,
            clock_offset_threshold_s: 30,
            battery_critical_percent: 10,
            battery_low_percent: 20,
        }
    }
}

impl Timing {
    /// Set the startup refresh delay
    pub fn with_initial_update_delay_ms(mut self, ms: u32) -> Self {
        self.initial_update_delay_ms = ms;
        self
    }

    /// Set how long tapped-in data is kept in manual-only mode
    pub fn with_drop_stale_delay_ms(mut self, ms: u32) -> Self {
        self.drop_stale_delay_ms = ms;
        self
    }

    /// Set the periodic refresh cadence (minimum 1 minute)
    pub fn with_update_period_minutes(mut self, minutes: u32) -> Self {
        self.update_period_minutes = minutes.max(1);
        self
    }

    /// Set the giveup threshold (negative minutes)
    pub fn with_giveup_minutes(mut self, minutes: i64) -> Self {
        self.giveup_minutes = minutes;
        self
    }

    /// Set the clock offset display threshold
    pub fn with_clock_offset_threshold_s(mut self, seconds: i32) -> Self {
        self.clock_offset_threshold_s = seconds;
        self
    }

    /// Set the battery marker thresholds
    pub fn with_battery_thresholds(mut self, critical: u8, low: u8) -> Self {
        self.battery_critical_percent = critical;
        self.battery_low_percent = low.max(critical);
        self
    }
}

/// Watch-face configuration fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceConfig {
    /// 12 or 24 hour clock
    pub clock_style: ClockStyle,
    /// Scheduling constants
    pub timing: Timing,
}

impl FaceConfig {
    /// Set the clock style
    pub fn with_clock_style(mut self, style: ClockStyle) -> Self {
        self.clock_style = style;
        self
    }

    /// Set the timing constants
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

// ============================================================================
// Link Config
// ============================================================================

/// Phone link configuration (MQTT broker standing in for the phone on desktop).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Broker hostname or IP
    pub host: LinkString,
    /// Broker port
    pub port: u16,
    /// Client ID (should be unique per watch)
    pub client_id: LinkString,
    /// Topic prefix (e.g., "commuter" -> "commuter/refresh")
    pub topic_prefix: LinkString,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: link_string("localhost"),
            port: 1883,
            client_id: link_string("rs-commuter"),
            topic_prefix: link_string("commuter"),
            keep_alive_secs: 30,
        }
    }
}

impl LinkConfig {
    /// Set the broker host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = link_string(host);
        self
    }

    /// Set the broker port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = link_string(id);
        self
    }

    /// Set the topic prefix
    pub fn with_topic_prefix(mut self, prefix: &str) -> Self {
        self.topic_prefix = link_string(prefix);
        self
    }

    /// Set the keep-alive interval
    pub fn with_keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Build a topic string with the configured prefix
    pub fn topic(&self, suffix: &str) -> HString<128> {
        let mut topic = HString::new();
        let _ = topic.push_str(self.topic_prefix.as_str());
        let _ = topic.push('/');
        let _ = topic.push_str(suffix);
        topic
    }
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete startup configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Watch-face display and scheduling
    pub face: FaceConfig,
    /// Phone link
    pub link: LinkConfig,
}

impl Config {
    /// Set face configuration
    pub fn with_face(mut self, face: FaceConfig) -> Self {
        self.face = face;
        self
    }

    /// Set link configuration
    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
