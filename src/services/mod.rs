//! Desktop runtime for the watch face (requires the `mqtt` feature).
//!
//! - `runtime`: tokio timers, minute ticks, stdin gestures and the event loop
//! - `mqtt`: phone link over an MQTT broker
//!
//! All sources feed a single event channel, so the face itself is never
//! shared between tasks:
//!
//! ```ignore
//! use rs_commuter::services::{connect, minute_ticks, run, run_link, TokioTimers};
//!
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let (bridge, eventloop) = connect(&config.link);
//! tokio::spawn(run_link(eventloop, bridge.client().clone(), config.link.clone(), tx.clone()));
//! tokio::spawn(minute_ticks(tx.clone()));
//!
//! let face = WatchFace::new(bridge, renderer, TokioTimers::new(tx));
//! run(face, rx).await?;
//! ```

pub mod mqtt;
pub mod runtime;

pub use mqtt::*;
pub use runtime::*;
