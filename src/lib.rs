//! # rs-commuter
//!
//! A watch-face controller that shows the time, the date and the next three
//! departures of a single commuter route, refreshed from a paired phone app.
//!
//! ## Features
//!
//! - **Update windows**: refresh only on chosen days and morning/evening hours
//! - **Imminent refresh**: ask again as soon as the next train is due
//! - **Manual mode**: refresh on tap only, and forget the data a minute later
//! - **Fixed-size text**: every field has a capacity and truncates, never fails
//! - **Collaborator traits**: phone link, renderer and timers are injected
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without a watch:
//!
//! - `window` - Is an automatic refresh allowed right now?
//! - `state` - Route, departures and device status
//! - `messages` - Phone message keys and decoding
//! - `format` - State + time → text fields and indicators
//! - `face` - Event handling and update scheduling
//! - `traits` - Phone link, renderer and timer abstractions
//! - `hal` - Concrete implementations (mocks, console, embedded-graphics)
//!
//! ## Example
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use rs_commuter::{
//!     hal::{MockBridge, MockRenderer, MockTimers},
//!     ClockStyle, Event, FaceConfig, WatchFace,
//! };
//!
//! let tz = FixedOffset::east_opt(0).unwrap();
//! let now = tz.with_ymd_and_hms(2025, 9, 3, 17, 45, 0).unwrap();
//!
//! let mut face = WatchFace::new(MockBridge::new(), MockRenderer::new(), MockTimers::new())
//!     .with_config(FaceConfig::default().with_clock_style(ClockStyle::TwelveHour));
//!
//! face.start(&now).unwrap();
//! face.handle(Event::Tick, &now).unwrap();
//!
//! let frame = face.renderer().last_frame().unwrap();
//! assert_eq!(frame.clock.as_str(), "5:45");
//! assert_eq!(face.bridge().sent, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Startup configuration and the phone-driven update schedule.
pub mod config;
/// Events delivered to the watch face.
pub mod events;
/// The watch face: event handling and update scheduling.
pub mod face;
/// Text fields and status indicators computed from state.
pub mod format;
/// Collaborator implementations with mocks for testing.
pub mod hal;
/// Phone message keys and inbound message decoding.
pub mod messages;
/// Persistent watch-face state.
pub mod state;
/// Collaborator traits: phone link, renderer, timers.
pub mod traits;
/// Update-window policy.
pub mod window;

/// Desktop runtime and MQTT phone link (feature-gated).
#[cfg(feature = "mqtt")]
pub mod services;

// Re-exports for convenience
pub use config::{ClockStyle, Config, FaceConfig, LinkConfig, ScheduleConfig, Timing};
pub use events::{DeliveryFailure, Event, TimerId, TimerKind};
pub use face::WatchFace;
pub use format::{
    compute_display, compute_indicators, BatteryAlert, DisplayOutput, Frame, Indicators,
};
pub use messages::{InboundMessage, MessageKey, TupleValue};
pub use state::{AppState, Departure, DeviceStatus, TrainState};
pub use traits::{MessageBridge, Renderer, TimerService};
pub use window::is_within_update_window;
