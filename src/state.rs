//! Persistent watch-face state.
//!
//! Everything the face remembers between events lives in one [`AppState`]
//! aggregate, owned by the [`WatchFace`](crate::WatchFace). It is mutated only
//! by inbound messages, stale-data expiry and device events.

use crate::config::{ScheduleConfig, StationCode};

/// Number of departures tracked on the face.
pub const TRACKED_DEPARTURES: usize = 3;

/// One upcoming departure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Departure {
    /// Scheduled departure, absolute seconds since the Unix epoch. 0 = unset.
    pub scheduled: i64,
    /// Operator cancelled this service.
    pub cancelled: bool,
}

impl Departure {
    /// Whether a departure time has been received.
    pub fn is_set(&self) -> bool {
        self.scheduled != 0
    }

    /// Forget the scheduled time.
    pub fn clear(&mut self) {
        self.scheduled = 0;
    }
}

/// The tracked route and its next three departures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainState {
    /// Origin station code.
    pub origin: StationCode,
    /// Destination station code.
    pub destination: StationCode,
    /// Next three departures, soonest first.
    pub departures: [Departure; TRACKED_DEPARTURES],
    /// Final destination of the first train (may be past `destination`).
    pub final_destination: StationCode,
    /// Platform of the first train. 0 or negative = unknown.
    pub platform: i32,
    /// The phone could not fetch departures last time it tried.
    pub last_request_failed: bool,
    /// Phone clock minus watch clock, in seconds.
    pub clock_offset_s: i32,
}

impl TrainState {
    /// Clear all three scheduled times, keeping route and flags.
    pub fn clear_departures(&mut self) {
        for departure in &mut self.departures {
            departure.clear();
        }
    }

    /// The first (soonest) departure.
    pub fn next(&self) -> &Departure {
        &self.departures[0]
    }

    /// Whether any departure time is known.
    pub fn has_departures(&self) -> bool {
        self.departures.iter().any(Departure::is_set)
    }
}

/// Battery and phone link status reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceStatus {
    /// Battery charge, 0-100.
    pub battery_percent: u8,
    /// Phone currently connected.
    pub phone_connected: bool,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            battery_percent: 100,
            phone_connected: true,
        }
    }
}

/// All watch-face state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppState {
    /// Phone-driven update schedule
    pub schedule: ScheduleConfig,
    /// Route and departures
    pub trains: TrainState,
    /// Battery and connectivity
    pub device: DeviceStatus,
}
