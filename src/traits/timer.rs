//! Deferred action scheduling.

use crate::events::{TimerId, TimerKind};

/// One-shot timers.
///
/// When a timer comes due the implementation delivers
/// [`Event::TimerFired`](crate::Event::TimerFired) carrying the returned id.
/// A cancelled timer may still fire if it was already in flight; the face
/// ignores ids it no longer holds.
pub trait TimerService {
    /// Schedule `kind` to fire after `delay_ms` milliseconds.
    fn schedule(&mut self, delay_ms: u32, kind: TimerKind) -> TimerId;

    /// Cancel a pending timer. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}
