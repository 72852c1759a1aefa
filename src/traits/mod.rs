//! Trait definitions for the watch face's external collaborators.
//!
//! These abstractions let the same face logic run on a watch, on a desktop
//! simulator, or under test with mocks from [`crate::hal::mock`].
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MessageBridge`] | Send refresh requests to the phone |
//! | [`Renderer`] | Draw text regions and status indicators |
//! | [`TimerService`] | One-shot deferred actions |

pub mod bridge;
pub mod display;
pub mod timer;

pub use bridge::*;
pub use display::*;
pub use timer::*;
