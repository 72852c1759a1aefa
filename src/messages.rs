//! Phone message keys and inbound message decoding.
//!
//! The phone talks to the watch with small dictionaries of numbered keys.
//! Values are either integers (booleans travel as 0/1) or short strings.
//! Keys may arrive in any order and any subset; the watch overwrites only the
//! fields a message carries.
//!
//! Decoding is forgiving: unknown keys, values of the wrong type and
//! out-of-range hours are skipped rather than rejected.
//!
//! # Example
//!
//! ```
//! use rs_commuter::messages::{InboundMessage, MessageKey, TupleValue};
//! use rs_commuter::AppState;
//!
//! let msg = InboundMessage::from_tuples([
//!     (MessageKey::Origin as u32, TupleValue::Str("CBG")),
//!     (MessageKey::Train1Time as u32, TupleValue::Int(1_756_890_000)),
//!     (MessageKey::Train1Platform as u32, TupleValue::Int(4)),
//!     (99, TupleValue::Str("ignored")),
//! ]);
//!
//! let mut state = AppState::default();
//! msg.apply(&mut state);
//! assert_eq!(state.trains.origin.as_str(), "CBG");
//! assert_eq!(state.trains.platform, 4);
//! ```

use crate::config::{station_code, StationCode};
use crate::state::{AppState, TRACKED_DEPARTURES};

// ============================================================================
// Keys
// ============================================================================

/// Numbered keys understood by the watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKey {
    /// Refresh marker (outbound only)
    Update = 0,
    /// Origin station code
    Origin = 1,
    /// Destination station code
    Destination = 2,
    /// First departure, epoch seconds
    Train1Time = 3,
    /// First train's final destination code
    Train1Dest = 4,
    /// First train's platform
    Train1Platform = 5,
    /// Second departure, epoch seconds
    Train2Time = 6,
    /// Third departure, epoch seconds
    Train3Time = 7,
    /// First train cancelled
    Train1Cancelled = 8,
    /// Restrict updates to chosen days
    CustomisedDays = 9,
    /// Monday enabled
    UseMonday = 10,
    /// Tuesday enabled
    UseTuesday = 11,
    /// Wednesday enabled
    UseWednesday = 12,
    /// Thursday enabled
    UseThursday = 13,
    /// Friday enabled
    UseFriday = 14,
    /// Saturday enabled
    UseSaturday = 15,
    /// Sunday enabled
    UseSunday = 16,
    /// Use the hours below instead of the defaults
    CustomisedTimes = 17,
    /// Morning window start hour
    MorningStart = 18,
    /// Morning window end hour
    MorningEnd = 19,
    /// Evening window start hour
    AfternoonStart = 20,
    /// Evening window end hour
    AfternoonEnd = 21,
    /// Second train cancelled
    Train2Cancelled = 24,
    /// Third train cancelled
    Train3Cancelled = 25,
    /// Phone clock offset from the watch, milliseconds
    TimeDiffFromUtc = 26,
    /// Phone failed to fetch departures
    LastRequestFailed = 27,
    /// Only refresh on tap
    UpdateOnlyOnTap = 28,
}

const ALL_KEYS: [MessageKey; 27] = [
    MessageKey::Update,
    MessageKey::Origin,
    MessageKey::Destination,
    MessageKey::Train1Time,
    MessageKey::Train1Dest,
    MessageKey::Train1Platform,
    MessageKey::Train2Time,
    MessageKey::Train3Time,
    MessageKey::Train1Cancelled,
    MessageKey::CustomisedDays,
    MessageKey::UseMonday,
    MessageKey::UseTuesday,
    MessageKey::UseWednesday,
    MessageKey::UseThursday,
    MessageKey::UseFriday,
    MessageKey::UseSaturday,
    MessageKey::UseSunday,
    MessageKey::CustomisedTimes,
    MessageKey::MorningStart,
    MessageKey::MorningEnd,
    MessageKey::AfternoonStart,
    MessageKey::AfternoonEnd,
    MessageKey::Train2Cancelled,
    MessageKey::Train3Cancelled,
    MessageKey::TimeDiffFromUtc,
    MessageKey::LastRequestFailed,
    MessageKey::UpdateOnlyOnTap,
];

impl MessageKey {
    /// Look up a key by its wire number.
    pub fn from_u32(raw: u32) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| *k as u32 == raw)
    }

    /// Look up a key by its name (`"KEY_TRAIN1_TIME"`) or its number as text (`"3"`).
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = ALL_KEYS.iter().copied().find(|k| k.name() == name) {
            return Some(key);
        }
        name.parse::<u32>().ok().and_then(Self::from_u32)
    }

    /// Name used by the phone app.
    pub fn name(self) -> &'static str {
        match self {
            Self::Update => "KEY_UPDATE",
            Self::Origin => "KEY_CURRENT_ORIGIN",
            Self::Destination => "KEY_CURRENT_DESTINATION",
            Self::Train1Time => "KEY_TRAIN1_TIME",
            Self::Train1Dest => "KEY_TRAIN1_DEST",
            Self::Train1Platform => "KEY_TRAIN1_PLATFORM",
            Self::Train2Time => "KEY_TRAIN2_TIME",
            Self::Train3Time => "KEY_TRAIN3_TIME",
            Self::Train1Cancelled => "KEY_TRAIN1_IS_CANCELED",
            Self::CustomisedDays => "CUSTOMISED_DAYS",
            Self::UseMonday => "USE_MONDAY",
            Self::UseTuesday => "USE_TUESDAY",
            Self::UseWednesday => "USE_WEDNESDAY",
            Self::UseThursday => "USE_THURSDAY",
            Self::UseFriday => "USE_FRIDAY",
            Self::UseSaturday => "USE_SATURDAY",
            Self::UseSunday => "USE_SUNDAY",
            Self::CustomisedTimes => "CUSTOMISED_TIMES",
            Self::MorningStart => "MORNING_START",
            Self::MorningEnd => "MORNING_END",
            Self::AfternoonStart => "AFTERNOON_START",
            Self::AfternoonEnd => "AFTERNOON_END",
            Self::Train2Cancelled => "KEY_TRAIN2_IS_CANCELED",
            Self::Train3Cancelled => "KEY_TRAIN3_IS_CANCELED",
            Self::TimeDiffFromUtc => "TIME_DIFF_FROM_UTC",
            Self::LastRequestFailed => "KEY_LAST_REQUEST_FAILED",
            Self::UpdateOnlyOnTap => "KEY_UPDATE_ONLY_ON_TAP",
        }
    }

    /// Sunday-indexed weekday slot for the `USE_*` day keys.
    fn day_index(self) -> Option<usize> {
        match self {
            Self::UseSunday => Some(0),
            Self::UseMonday => Some(1),
            Self::UseTuesday => Some(2),
            Self::UseWednesday => Some(3),
            Self::UseThursday => Some(4),
            Self::UseFriday => Some(5),
            Self::UseSaturday => Some(6),
            _ => None,
        }
    }
}

/// The outbound refresh request: a single marker field.
pub const REFRESH_REQUEST: (MessageKey, i32) = (MessageKey::Update, 1);

// ============================================================================
// Values
// ============================================================================

/// A decoded dictionary value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TupleValue<'a> {
    /// Integer (booleans are 0/1)
    Int(i32),
    /// Text
    Str(&'a str),
}

impl<'a> TupleValue<'a> {
    /// Integer value, if this is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Str(_) => None,
        }
    }

    /// Boolean value: any non-zero integer is `true`.
    pub fn as_flag(&self) -> Option<bool> {
        self.as_int().map(|v| v != 0)
    }

    /// Text value, if this is one.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Str(s) => Some(*s),
            Self::Int(_) => None,
        }
    }
}

// ============================================================================
// Inbound Message
// ============================================================================

/// One inbound message: every field the phone may send, each optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InboundMessage {
    /// Origin station code
    pub origin: Option<StationCode>,
    /// Destination station code
    pub destination: Option<StationCode>,
    /// Departure times, epoch seconds
    pub train_times: [Option<i64>; TRACKED_DEPARTURES],
    /// Cancellation flags
    pub train_cancelled: [Option<bool>; TRACKED_DEPARTURES],
    /// First train's final destination
    pub final_destination: Option<StationCode>,
    /// First train's platform
    pub platform: Option<i32>,
    /// Custom days flag
    pub custom_days: Option<bool>,
    /// Per-day flags, Sunday-indexed
    pub days: [Option<bool>; 7],
    /// Custom hours flag
    pub custom_hours: Option<bool>,
    /// Morning window start
    pub morning_start: Option<u8>,
    /// Morning window end
    pub morning_end: Option<u8>,
    /// Evening window start
    pub evening_start: Option<u8>,
    /// Evening window end
    pub evening_end: Option<u8>,
    /// Manual-only flag
    pub manual_only: Option<bool>,
    /// Phone request failure flag
    pub last_request_failed: Option<bool>,
    /// Phone clock offset, milliseconds
    pub clock_offset_ms: Option<i32>,
}

impl InboundMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a message from raw `(key, value)` tuples.
    pub fn from_tuples<'a, I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (u32, TupleValue<'a>)>,
    {
        let mut msg = Self::new();
        for (raw, value) in tuples {
            match MessageKey::from_u32(raw) {
                Some(key) => {
                    msg.set(key, value);
                }
                None => tracing::debug!(key = raw, "ignoring unknown message key"),
            }
        }
        msg
    }

    /// Record one field. Returns `false` when the value was ignored.
    pub fn set(&mut self, key: MessageKey, value: TupleValue<'_>) -> bool {
        use MessageKey as K;

        if let Some(day) = key.day_index() {
            return store(&mut self.days[day], value.as_flag());
        }

        match key {
            K::Update => false,
            K::Origin => store(&mut self.origin, value.as_str().map(station_code)),
            K::Destination => store(&mut self.destination, value.as_str().map(station_code)),
            K::Train1Dest => store(&mut self.final_destination, value.as_str().map(station_code)),
            K::Train1Time => store(&mut self.train_times[0], value.as_int().map(i64::from)),
            K::Train2Time => store(&mut self.train_times[1], value.as_int().map(i64::from)),
            K::Train3Time => store(&mut self.train_times[2], value.as_int().map(i64::from)),
            K::Train1Cancelled => store(&mut self.train_cancelled[0], value.as_flag()),
            K::Train2Cancelled => store(&mut self.train_cancelled[1], value.as_flag()),
            K::Train3Cancelled => store(&mut self.train_cancelled[2], value.as_flag()),
            K::Train1Platform => store(&mut self.platform, value.as_int()),
            K::CustomisedDays => store(&mut self.custom_days, value.as_flag()),
            K::CustomisedTimes => store(&mut self.custom_hours, value.as_flag()),
            K::MorningStart => store(&mut self.morning_start, hour(value)),
            K::MorningEnd => store(&mut self.morning_end, hour(value)),
            K::AfternoonStart => store(&mut self.evening_start, hour(value)),
            K::AfternoonEnd => store(&mut self.evening_end, hour(value)),
            K::UpdateOnlyOnTap => store(&mut self.manual_only, value.as_flag()),
            K::LastRequestFailed => store(&mut self.last_request_failed, value.as_flag()),
            K::TimeDiffFromUtc => store(&mut self.clock_offset_ms, value.as_int()),
            // Day keys handled above
            K::UseMonday
            | K::UseTuesday
            | K::UseWednesday
            | K::UseThursday
            | K::UseFriday
            | K::UseSaturday
            | K::UseSunday => false,
        }
    }

    /// Whether the message carries no recognised field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this message into the watch state.
    ///
    /// Only carried fields are overwritten. Afterwards the custom-hours flag
    /// mirrors what this message asserted; when it did not assert custom
    /// hours, the four window hours go back to their defaults.
    pub fn apply(&self, state: &mut AppState) {
        let trains = &mut state.trains;
        overwrite(&mut trains.origin, &self.origin);
        overwrite(&mut trains.destination, &self.destination);
        overwrite(&mut trains.final_destination, &self.final_destination);
        overwrite(&mut trains.platform, &self.platform);
        overwrite(&mut trains.last_request_failed, &self.last_request_failed);
        if let Some(ms) = self.clock_offset_ms {
            trains.clock_offset_s = ms / 1000;
        }
        for (departure, (time, cancelled)) in trains
            .departures
            .iter_mut()
            .zip(self.train_times.iter().zip(self.train_cancelled.iter()))
        {
            overwrite(&mut departure.scheduled, time);
            overwrite(&mut departure.cancelled, cancelled);
        }

        let schedule = &mut state.schedule;
        overwrite(&mut schedule.use_custom_days, &self.custom_days);
        for (enabled, flag) in schedule.enabled_days.iter_mut().zip(self.days.iter()) {
            overwrite(enabled, flag);
        }
        overwrite(&mut schedule.morning_start, &self.morning_start);
        overwrite(&mut schedule.morning_end, &self.morning_end);
        overwrite(&mut schedule.evening_start, &self.evening_start);
        overwrite(&mut schedule.evening_end, &self.evening_end);
        overwrite(&mut schedule.manual_only, &self.manual_only);

        schedule.use_custom_hours = self.custom_hours == Some(true);
        if !schedule.use_custom_hours {
            schedule.reset_hours();
        }

        tracing::debug!(
            departures = self.train_times.iter().filter(|t| t.is_some()).count(),
            custom_hours = schedule.use_custom_hours,
            manual_only = schedule.manual_only,
            "applied inbound message"
        );
    }
}

fn store<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn overwrite<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// Window hours must land in 0..=24 (24 meaning "until midnight").
fn hour(value: TupleValue<'_>) -> Option<u8> {
    value
        .as_int()
        .filter(|h| (0..=24).contains(h))
        .and_then(|h| u8::try_from(h).ok())
}

// ============================================================================
// JSON encoding (phone link over MQTT/websocket)
// ============================================================================

#[cfg(feature = "json")]
mod json {
    use super::{InboundMessage, MessageKey, TupleValue, REFRESH_REQUEST};
    use serde_json::{Map, Value};

    impl InboundMessage {
        /// Decode a message from a JSON object keyed by message-key names.
        ///
        /// ```json
        /// {"KEY_CURRENT_ORIGIN": "CBG", "KEY_TRAIN1_TIME": 1756890000, "USE_MONDAY": true}
        /// ```
        ///
        /// Fails only when the payload is not a JSON object.
        pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
            let fields: Map<String, Value> = serde_json::from_str(payload)?;
            let mut msg = Self::new();
            for (name, value) in &fields {
                let Some(key) = MessageKey::from_name(name) else {
                    tracing::debug!(key = %name, "ignoring unknown message key");
                    continue;
                };
                let decoded = match value {
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .map(TupleValue::Int),
                    Value::Bool(b) => Some(TupleValue::Int(i32::from(*b))),
                    Value::String(s) => Some(TupleValue::Str(s.as_str())),
                    _ => None,
                };
                let accepted = decoded.map(|v| msg.set(key, v)).unwrap_or(false);
                if !accepted {
                    tracing::debug!(key = %name, "ignoring mistyped message field");
                }
            }
            Ok(msg)
        }
    }

    /// Encode the refresh request as `{"KEY_UPDATE":1}`.
    pub fn refresh_request_json() -> String {
        let (key, value) = REFRESH_REQUEST;
        let mut fields = Map::new();
        fields.insert(key.name().to_string(), Value::from(value));
        Value::Object(fields).to_string()
    }
}

#[cfg(feature = "json")]
pub use json::refresh_request_json;

// ============================================================================
// Tests
// ============================================================================
