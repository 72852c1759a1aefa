//! Concrete implementations of the traits defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for all collaborators
//! - `console`: Plain-text renderer (requires `std`)
//! - `graphics`: `embedded-graphics` renderer for the 144x168 face (requires `graphics`)

pub mod mock;

#[cfg(feature = "std")]
pub mod console;

#[cfg(feature = "graphics")]
pub mod graphics;

pub use mock::*;

#[cfg(feature = "std")]
pub use console::*;

#[cfg(feature = "graphics")]
pub use graphics::*;
