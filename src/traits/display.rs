//! Renderer abstraction for the watch face.
//!
//! This module defines the [`Renderer`] trait that draws computed text and
//! status indicators on a screen (watch display, terminal, framebuffer).

use crate::format::{Frame, Indicators};

/// Draws the watch face.
///
/// Implementors own fonts, layout and colours. The face hands over finished
/// text; renderers never format times themselves.
///
/// # Example
///
/// ```rust
/// use rs_commuter::format::{Frame, Indicators};
/// use rs_commuter::traits::Renderer;
///
/// struct Null;
///
/// impl Renderer for Null {
///     type Error = ();
///
///     fn render(&mut self, _frame: &Frame) -> Result<(), ()> { Ok(()) }
///     fn render_indicators(&mut self, _ind: &Indicators) -> Result<(), ()> { Ok(()) }
///     fn set_connected(&mut self, _connected: bool) -> Result<(), ()> { Ok(()) }
/// }
/// ```
pub trait Renderer {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Redraws the clock, date and the three departure columns.
    fn render(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Redraws the status strip (battery, failure square, clock offset).
    fn render_indicators(&mut self, indicators: &Indicators) -> Result<(), Self::Error>;

    /// Phone link went up or down.
    ///
    /// Watch renderers switch background tone and may vibrate.
    fn set_connected(&mut self, connected: bool) -> Result<(), Self::Error>;
}
