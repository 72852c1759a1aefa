//! Desktop simulator: the watch face in a terminal, the phone over MQTT.
//!
//! Prints the face to stdout whenever it redraws and publishes refresh
//! requests to `<prefix>/refresh`. Play the phone by publishing train data:
//!
//! ```sh
//! mosquitto_pub -t commuter/trains -m '{"KEY_CURRENT_ORIGIN": "CBG",
//!     "KEY_TRAIN1_DEST": "LST", "KEY_TRAIN1_TIME": 1756890000, "KEY_TRAIN1_PLATFORM": 4}'
//! ```
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim --features mqtt
//! ```
//!
//! Type `t` (or just Enter) to tap, `b 15` to set the battery, `d`/`c` to
//! drop/restore the phone connection, `q` to stop reading input.
//!
//! # Configuration
//!
//! - `MQTT_HOST` / `MQTT_PORT`: broker address (default `localhost:1883`)
//! - `CLOCK_12H=1`: 12 hour clock
//! - `RUST_LOG`: log filter (default `info`)

use rs_commuter::hal::ConsoleRenderer;
use rs_commuter::services::{connect, minute_ticks, run, run_link, stdin_gestures, TokioTimers};
use rs_commuter::{ClockStyle, Config, FaceConfig, LinkConfig, WatchFace};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let host = std::env::var("MQTT_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(1883);
    let clock_style = match std::env::var("CLOCK_12H").as_deref() {
        Ok("1") => ClockStyle::TwelveHour,
        _ => ClockStyle::TwentyFourHour,
    };

    let config = Config::default()
        .with_face(FaceConfig::default().with_clock_style(clock_style))
        .with_link(LinkConfig::default().with_host(&host).with_port(port));

    println!("=================================");
    println!("  rs-commuter Desktop Simulator");
    println!("=================================");
    println!();
    println!("Broker:  {}:{}", config.link.host, config.link.port);
    println!("Publish: {}", config.link.topic("refresh"));
    println!("Listen:  {}", config.link.topic("trains"));
    println!();

    let (tx, rx) = mpsc::unbounded_channel();

    let (bridge, eventloop) = connect(&config.link);
    tokio::spawn(run_link(
        eventloop,
        bridge.client().clone(),
        config.link.clone(),
        tx.clone(),
    ));
    tokio::spawn(minute_ticks(tx.clone()));
    tokio::spawn(stdin_gestures(tx.clone()));

    let face = WatchFace::new(bridge, ConsoleRenderer::new(std::io::stdout()), TokioTimers::new(tx))
        .with_config(config.face);

    run(face, rx).await
}
