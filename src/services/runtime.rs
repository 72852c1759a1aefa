//! Tokio runtime pieces for running the face on a desktop.
//!
//! Every event source (minute ticks, timers, stdin gestures, the phone link)
//! pushes [`Event`]s into one unbounded channel. [`run`] drains that channel
//! and hands events to the [`WatchFace`] strictly one at a time, which keeps
//! the face single-threaded even though the sources run as separate tasks.
//!
//! ```ignore
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! tokio::spawn(minute_ticks(tx.clone()));
//! tokio::spawn(stdin_gestures(tx.clone()));
//!
//! let face = WatchFace::new(bridge, renderer, TokioTimers::new(tx));
//! run(face, rx).await?;
//! ```

use std::collections::HashMap;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{Local, Timelike};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::events::{Event, TimerId, TimerKind};
use crate::face::WatchFace;
use crate::traits::{MessageBridge, Renderer, TimerService};

/// Sending half of the face's event channel.
pub type EventSender = UnboundedSender<Event>;

// ============================================================================
// Timers
// ============================================================================

/// [`TimerService`] backed by tokio tasks.
///
/// Each timer is a task that sleeps, then sends [`Event::TimerFired`].
/// Cancelling aborts the task. Must be used from inside a tokio runtime.
pub struct TokioTimers {
    tx: EventSender,
    handles: HashMap<u32, JoinHandle<()>>,
    next_id: u32,
}

impl TokioTimers {
    /// Create a timer service delivering into `tx`
    pub fn new(tx: EventSender) -> Self {
        Self {
            tx,
            handles: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }
}

impl TimerService for TokioTimers {
    fn schedule(&mut self, delay_ms: u32, kind: TimerKind) -> TimerId {
        self.handles.retain(|_, h| !h.is_finished());
        self.next_id = self.next_id.wrapping_add(1);
        let id = TimerId(self.next_id);

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
            let _ = tx.send(Event::TimerFired { id, kind });
        });
        self.handles.insert(id.0, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.handles.remove(&id.0) {
            handle.abort();
        }
    }
}

// ============================================================================
// Event sources
// ============================================================================

/// Send [`Event::Tick`] at every wall-clock minute boundary.
///
/// Returns when the face's channel closes.
pub async fn minute_ticks(tx: EventSender) {
    loop {
        let now = Local::now();
        let nanos = now.nanosecond() % 1_000_000_000;
        let into_minute = Duration::new(u64::from(now.second()), nanos);
        let wait = Duration::from_secs(60).saturating_sub(into_minute);
        tokio::time::sleep(wait).await;

        if tx.send(Event::Tick).is_err() {
            return;
        }
    }
}

/// Read gestures from stdin.
///
/// | Input | Event |
/// |-------|-------|
/// | empty line or `t` | manual trigger |
/// | `b <percent>` | battery change |
/// | `c` / `d` | phone connected / disconnected |
/// | `q` | stop reading |
pub async fn stdin_gestures(tx: EventSender) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_gesture(&line) else {
            if line.trim() == "q" {
                break;
            }
            tracing::warn!(input = %line, "unrecognised input");
            continue;
        };
        if tx.send(event).is_err() {
            break;
        }
    }
    Ok(())
}

/// Parse one line of stdin input into an event.
pub fn parse_gesture(line: &str) -> Option<Event> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None | Some("t") => Some(Event::ManualTrigger),
        Some("b") => parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .map(Event::BatteryChanged),
        Some("c") => Some(Event::ConnectionChanged(true)),
        Some("d") => Some(Event::ConnectionChanged(false)),
        _ => None,
    }
}

// ============================================================================
// Event loop
// ============================================================================

/// Start the face and feed it events.
///
/// The face's [`TokioTimers`] keeps a sender alive, so the loop runs for as
/// long as the process does. It stops early only with an error when the
/// renderer fails.
pub async fn run<B, R>(
    mut face: WatchFace<B, R, TokioTimers>,
    mut rx: UnboundedReceiver<Event>,
) -> anyhow::Result<()>
where
    B: MessageBridge,
    R: Renderer,
{
    face.start(&Local::now())
        .map_err(|e| anyhow!("initial render failed: {e:?}"))?;
    tracing::info!("watch face started");

    while let Some(event) = rx.recv().await {
        face.handle(event, &Local::now())
            .map_err(|e| anyhow!("render failed: {e:?}"))?;
    }

    tracing::info!("event channel closed, stopping");
    Ok(())
}
