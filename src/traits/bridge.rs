//! Phone link abstraction.
//!
//! Only the outbound half lives here. Inbound messages and delivery reports
//! arrive as [`Event`](crate::Event)s, because on a watch they come from
//! platform callbacks rather than from a call the face makes.

/// Outbound side of the phone link.
///
/// Sends are fire-and-forget: `Ok` means the request was handed to the
/// transport, not that the phone received it. Delivery is reported later via
/// [`Event::OutboxSent`](crate::Event::OutboxSent) or
/// [`Event::OutboxFailed`](crate::Event::OutboxFailed).
///
/// # Implementation Notes
///
/// - Must not block
/// - Must not retry; the next tick or tap is the retry
///
/// # Example
///
/// ```rust
/// use rs_commuter::traits::MessageBridge;
///
/// struct Loopback { pending: usize }
///
/// impl MessageBridge for Loopback {
///     type Error = ();
///
///     fn send_refresh_request(&mut self) -> Result<(), ()> {
///         self.pending += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait MessageBridge {
    /// Error type for send failures.
    type Error: core::fmt::Debug;

    /// Ask the phone for fresh departures (a single `KEY_UPDATE` marker).
    fn send_refresh_request(&mut self) -> Result<(), Self::Error>;
}
