//! The watch face: update scheduling and event handling.
//!
//! This module provides [`WatchFace`], the central component that owns the
//! [`AppState`] and decides when to ask the phone for fresh departures.
//!
//! # Overview
//!
//! The face reacts to [`Event`]s delivered one at a time:
//!
//! | Event | Reaction |
//! |-------|----------|
//! | `Tick` | Redraw; request an update when a train is due or on the periodic minute |
//! | `ManualTrigger` | Request an update; in manual-only mode (re)arm the stale-data timer |
//! | `TimerFired` | Startup request, or forget tapped-in departures |
//! | `Inbox` | Merge the message, redraw |
//! | `ConnectionChanged` | Tell the renderer |
//! | `BatteryChanged` | Redraw indicators |
//!
//! State is always fully updated before the renderer is called.
//!
//! # Example
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use rs_commuter::{
//!     hal::{MockBridge, MockRenderer, MockTimers},
//!     messages::{InboundMessage, MessageKey, TupleValue},
//!     Event, WatchFace,
//! };
//!
//! let tz = FixedOffset::east_opt(0).unwrap();
//! let now = tz.with_ymd_and_hms(2025, 9, 3, 8, 30, 0).unwrap();
//!
//! let mut face = WatchFace::new(MockBridge::new(), MockRenderer::new(), MockTimers::new());
//! face.start(&now).unwrap();
//!
//! // 08:30 is inside the default morning window and on the 15 minute cadence
//! face.handle(Event::Tick, &now).unwrap();
//! assert_eq!(face.bridge().sent, 1);
//!
//! // The phone answers
//! let msg = InboundMessage::from_tuples([
//!     (MessageKey::Train1Time as u32, TupleValue::Int(now.timestamp() as i32 + 300)),
//! ]);
//! face.handle(Event::Inbox(msg), &now).unwrap();
//! assert!(face.renderer().last_frame().unwrap().next_train.starts_with("5 min"));
//! ```

use chrono::{DateTime, TimeZone, Timelike};

use crate::config::FaceConfig;
use crate::events::{Event, TimerId, TimerKind};
use crate::format::{compute_display, compute_indicators, DisplayOutput};
use crate::state::AppState;
use crate::traits::{MessageBridge, Renderer, TimerService};
use crate::window::is_within_update_window;

/// Commuter watch face.
///
/// Owns all state and the three collaborators. Events are handled strictly
/// one after another through [`handle`](Self::handle).
///
/// # Type Parameters
///
/// - `B`: phone link ([`MessageBridge`])
/// - `R`: screen ([`Renderer`])
/// - `T`: deferred actions ([`TimerService`])
///
/// Renderer errors are returned to the caller. Bridge errors are logged and
/// otherwise ignored: the next tick or tap will try again.
pub struct WatchFace<B, R, T> {
    state: AppState,
    config: FaceConfig,
    bridge: B,
    renderer: R,
    timers: T,
    drop_stale_timer: Option<TimerId>,
}

impl<B, R, T> WatchFace<B, R, T>
where
    B: MessageBridge,
    R: Renderer,
    T: TimerService,
{
    /// Create a face with default configuration and empty state
    pub fn new(bridge: B, renderer: R, timers: T) -> Self {
        Self {
            state: AppState::default(),
            config: FaceConfig::default(),
            bridge,
            renderer,
            timers,
            drop_stale_timer: None,
        }
    }

    /// Use a specific face configuration
    pub fn with_config(mut self, config: FaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from existing state
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// First render, then arm the startup refresh.
    pub fn start<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<(), R::Error> {
        self.redraw(now)?;
        let delay = self.config.timing.initial_update_delay_ms;
        let id = self.timers.schedule(delay, TimerKind::InitialUpdate);
        tracing::debug!(timer = id.0, delay_ms = delay, "startup refresh scheduled");
        Ok(())
    }

    /// Handle one event.
    pub fn handle<Tz: TimeZone>(
        &mut self,
        event: Event,
        now: &DateTime<Tz>,
    ) -> Result<(), R::Error> {
        tracing::trace!(event = event.name(), link = event.is_link_event(), "handling event");
        match event {
            Event::Tick => self.on_tick(now),
            Event::ManualTrigger => self.on_manual_trigger(now),
            Event::TimerFired { id, kind } => self.on_timer(id, kind, now),
            Event::Inbox(msg) => {
                msg.apply(&mut self.state);
                self.redraw(now).map(|_| ())
            }
            Event::InboxDropped(reason) => {
                tracing::warn!(?reason, "inbound message dropped");
                Ok(())
            }
            Event::OutboxSent => {
                tracing::debug!("refresh request delivered");
                Ok(())
            }
            Event::OutboxFailed(reason) => {
                tracing::warn!(?reason, "refresh request failed");
                Ok(())
            }
            Event::ConnectionChanged(connected) => {
                tracing::info!(connected, "phone connection changed");
                self.state.device.phone_connected = connected;
                self.renderer.set_connected(connected)
            }
            Event::BatteryChanged(percent) => {
                self.state.device.battery_percent = percent.min(100);
                self.render_indicators()
            }
        }
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn on_tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<(), R::Error> {
        let out = self.redraw(now)?;
        if self.state.schedule.manual_only {
            return Ok(());
        }

        let period = self.config.timing.update_period_minutes.max(1);
        let on_cadence = now.naive_local().minute() % period == 0;
        if out.needs_imminent_update || on_cadence {
            self.request_update(now)?;
        }
        Ok(())
    }

    fn on_manual_trigger<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<(), R::Error> {
        self.request_update(now)?;

        if self.state.schedule.manual_only {
            if let Some(old) = self.drop_stale_timer.take() {
                self.timers.cancel(old);
                tracing::debug!(timer = old.0, "stale-data timer cancelled");
            }
            let delay = self.config.timing.drop_stale_delay_ms;
            let id = self.timers.schedule(delay, TimerKind::DropStaleDepartures);
            self.drop_stale_timer = Some(id);
            tracing::debug!(timer = id.0, delay_ms = delay, "stale-data timer scheduled");
        }
        Ok(())
    }

    fn on_timer<Tz: TimeZone>(
        &mut self,
        id: TimerId,
        kind: TimerKind,
        now: &DateTime<Tz>,
    ) -> Result<(), R::Error> {
        match kind {
            TimerKind::InitialUpdate => {
                if !self.state.schedule.manual_only {
                    self.request_update(now)?;
                }
                Ok(())
            }
            TimerKind::DropStaleDepartures => {
                if self.drop_stale_timer != Some(id) {
                    tracing::debug!(timer = id.0, "ignoring replaced stale-data timer");
                    return Ok(());
                }
                self.drop_stale_timer = None;
                if self.state.schedule.manual_only {
                    tracing::info!("dropping tapped-in departures");
                    self.state.trains.clear_departures();
                    self.redraw(now)?;
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Ask the phone for fresh departures if the update window allows it.
    ///
    /// Returns `true` when a request was handed to the bridge. Indicators are
    /// redrawn either way.
    pub fn request_update<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<bool, R::Error> {
        let sent = if is_within_update_window(&self.state.schedule, &now.naive_local()) {
            match self.bridge.send_refresh_request() {
                Ok(()) => {
                    tracing::info!("refresh requested");
                    true
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "refresh request not sent");
                    false
                }
            }
        } else {
            tracing::debug!("outside update window, refresh suppressed");
            false
        };

        self.render_indicators()?;
        Ok(sent)
    }

    /// Recompute and draw the whole face.
    ///
    /// Long-gone departures are forgotten before anything is drawn.
    pub fn redraw<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<DisplayOutput, R::Error> {
        let out = compute_display(&self.state.trains, &self.state.schedule, &self.config, now);
        if out.abandoned {
            self.state.trains.clear_departures();
        }
        self.renderer.render(&out.frame)?;
        self.render_indicators()?;
        Ok(out)
    }

    fn render_indicators(&mut self) -> Result<(), R::Error> {
        let indicators = compute_indicators(&self.state, &self.config.timing);
        self.renderer.render_indicators(&indicators)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Face configuration
    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// Pending stale-data timer, if any
    pub fn drop_stale_timer(&self) -> Option<TimerId> {
        self.drop_stale_timer
    }

    /// Phone link
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Mutable phone link
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Screen
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Timer service
    pub fn timers(&self) -> &T {
        &self.timers
    }
}
