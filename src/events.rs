//! Events delivered to the watch face, one at a time.

use crate::messages::InboundMessage;

/// Handle for a scheduled deferred action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u32);

/// What a deferred action does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerKind {
    /// Startup refresh request
    InitialUpdate,
    /// Forget tapped-in departures in manual-only mode
    DropStaleDepartures,
}

/// Why a message failed to go out or come in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryFailure {
    /// No phone connected
    NotConnected,
    /// Link busy with another message
    Busy,
    /// Payload could not be decoded
    Malformed,
    /// No acknowledgement in time
    Timeout,
    /// Peer refused the message
    Rejected,
    /// Platform-specific reason code
    Other(u32),
}

/// Events that drive the watch face
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    // Time events
    /// Wall-clock minute boundary
    Tick,
    /// A deferred action came due
    TimerFired {
        /// Which timer
        id: TimerId,
        /// What it was scheduled for
        kind: TimerKind,
    },

    // User events
    /// Tap/shake gesture asking for fresh data
    ManualTrigger,

    // Phone link events
    /// Message from the phone
    Inbox(InboundMessage),
    /// An inbound message was lost
    InboxDropped(DeliveryFailure),
    /// Refresh request acknowledged
    OutboxSent,
    /// Refresh request failed
    OutboxFailed(DeliveryFailure),
    /// Phone connected or disconnected
    ConnectionChanged(bool),

    // Device events
    /// Battery charge changed, in percent
    BatteryChanged(u8),
}

impl Event {
    /// Check if this event came from the phone link
    pub fn is_link_event(&self) -> bool {
        matches!(
            self,
            Event::Inbox(_)
                | Event::InboxDropped(_)
                | Event::OutboxSent
                | Event::OutboxFailed(_)
                | Event::ConnectionChanged(_)
        )
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::Tick => "tick",
            Event::TimerFired { .. } => "timer_fired",
            Event::ManualTrigger => "manual_trigger",
            Event::Inbox(_) => "inbox",
            Event::InboxDropped(_) => "inbox_dropped",
            Event::OutboxSent => "outbox_sent",
            Event::OutboxFailed(_) => "outbox_failed",
            Event::ConnectionChanged(_) => "connection_changed",
            Event::BatteryChanged(_) => "battery_changed",
        }
    }
}
