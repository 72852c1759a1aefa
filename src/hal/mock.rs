//! Mock implementations for testing without a watch or phone.
//!
//! This module provides test doubles for all collaborator traits, enabling
//! development and testing on desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockBridge`] | [`MessageBridge`] | Counts refresh requests, can fail on demand |
//! | [`MockRenderer`] | [`Renderer`] | Records every frame and indicator strip |
//! | [`MockTimers`] | [`TimerService`] | Records scheduled and cancelled timers |
//!
//! # Example
//!
//! ```rust
//! use rs_commuter::hal::{MockBridge, MockRenderer, MockTimers};
//! use rs_commuter::traits::{MessageBridge, TimerService};
//! use rs_commuter::events::TimerKind;
//!
//! let mut bridge = MockBridge::new();
//! bridge.send_refresh_request().unwrap();
//! assert_eq!(bridge.sent, 1);
//!
//! let mut timers = MockTimers::new();
//! let id = timers.schedule(60_000, TimerKind::DropStaleDepartures);
//! timers.cancel(id);
//! assert!(timers.is_cancelled(id));
//! ```
//!
//! [`MessageBridge`]: crate::traits::MessageBridge
//! [`Renderer`]: crate::traits::Renderer
//! [`TimerService`]: crate::traits::TimerService

use alloc::vec::Vec;

use crate::events::{TimerId, TimerKind};
use crate::format::{Frame, Indicators};
use crate::traits::{MessageBridge, Renderer, TimerService};

// ============================================================================
// Link Mock
// ============================================================================

/// Mock phone link.
///
/// Set `fail` to make every send return an error.
#[derive(Debug, Default)]
pub struct MockBridge {
    /// Refresh requests handed over successfully.
    pub sent: usize,
    /// Refresh requests rejected because `fail` was set.
    pub failed: usize,
    /// Reject sends.
    pub fail: bool,
}

impl MockBridge {
    /// Creates a working mock link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock link whose sends always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl MessageBridge for MockBridge {
    type Error = ();

    fn send_refresh_request(&mut self) -> Result<(), ()> {
        if self.fail {
            self.failed += 1;
            return Err(());
        }
        self.sent += 1;
        Ok(())
    }
}

// ============================================================================
// Renderer Mock
// ============================================================================

/// Mock renderer that tracks every draw call.
#[derive(Debug, Default)]
pub struct MockRenderer {
    /// Every frame rendered, oldest first.
    pub frames: Vec<Frame>,
    /// Most recent indicator strip.
    pub last_indicators: Option<Indicators>,
    /// Number of indicator redraws.
    pub indicator_count: usize,
    /// Last connectivity state reported, if any.
    pub connected: Option<bool>,
}

impl MockRenderer {
    /// Creates an empty mock renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Renderer for MockRenderer {
    type Error = ();

    fn render(&mut self, frame: &Frame) -> Result<(), ()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn render_indicators(&mut self, indicators: &Indicators) -> Result<(), ()> {
        self.last_indicators = Some(indicators.clone());
        self.indicator_count += 1;
        Ok(())
    }

    fn set_connected(&mut self, connected: bool) -> Result<(), ()> {
        self.connected = Some(connected);
        Ok(())
    }
}

// ============================================================================
// Timer Mock
// ============================================================================

/// Mock timer service.
///
/// Timers never fire on their own; tests deliver
/// [`Event::TimerFired`](crate::Event::TimerFired) themselves.
#[derive(Debug, Default)]
pub struct MockTimers {
    /// Scheduled timers as `(id, delay_ms, kind)`, oldest first.
    pub scheduled: Vec<(TimerId, u32, TimerKind)>,
    /// Cancelled timer ids.
    pub cancelled: Vec<TimerId>,
    next_id: u32,
}

impl MockTimers {
    /// Creates an empty timer service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently scheduled timer of `kind`.
    pub fn last_of(&self, kind: TimerKind) -> Option<TimerId> {
        self.scheduled
            .iter()
            .rev()
            .find(|(_, _, k)| *k == kind)
            .map(|(id, _, _)| *id)
    }

    /// Check if a timer was cancelled
    pub fn is_cancelled(&self, id: TimerId) -> bool {
        self.cancelled.contains(&id)
    }

    /// Number of timers of `kind` scheduled so far.
    pub fn count_of(&self, kind: TimerKind) -> usize {
        self.scheduled.iter().filter(|(_, _, k)| *k == kind).count()
    }
}

impl TimerService for MockTimers {
    fn schedule(&mut self, delay_ms: u32, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.scheduled.push((id, delay_ms, kind));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
    }
}
