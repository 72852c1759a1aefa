//! MQTT link standing in for the phone on desktop.
//!
//! A phone-side script (or `mosquitto_pub`) plays the phone app:
//!
//! **Subscribe Topics:**
//! - `commuter/trains` - inbound message as JSON keyed by message-key names,
//!   e.g. `{"KEY_CURRENT_ORIGIN": "CBG", "KEY_TRAIN1_TIME": 1756890000}`
//!
//! **Publish Topics:**
//! - `commuter/refresh` - refresh request `{"KEY_UPDATE":1}`
//!
//! The prefix comes from [`LinkConfig::topic_prefix`].

use std::time::Duration;

use rumqttc::{AsyncClient, ClientError, Event as MqttEvent, EventLoop, MqttOptions, Packet, QoS};

use crate::config::LinkConfig;
use crate::events::{DeliveryFailure, Event};
use crate::messages::{refresh_request_json, InboundMessage};
use crate::traits::MessageBridge;

use super::runtime::EventSender;

/// Topic suffix for refresh requests.
pub const REFRESH_TOPIC: &str = "refresh";
/// Topic suffix for inbound train data.
pub const TRAINS_TOPIC: &str = "trains";

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

// ============================================================================
// Bridge
// ============================================================================

/// [`MessageBridge`] publishing refresh requests over MQTT.
///
/// Uses `try_publish`, so a send never waits on the network.
pub struct MqttBridge {
    client: AsyncClient,
    topic: String,
}

impl MqttBridge {
    /// Wrap a connected client
    pub fn new(client: AsyncClient, config: &LinkConfig) -> Self {
        Self {
            client,
            topic: config.topic(REFRESH_TOPIC).as_str().to_string(),
        }
    }

    /// The underlying client (for the link task)
    pub fn client(&self) -> &AsyncClient {
        &self.client
    }
}

impl MessageBridge for MqttBridge {
    type Error = ClientError;

    fn send_refresh_request(&mut self) -> Result<(), ClientError> {
        self.client.try_publish(
            self.topic.as_str(),
            QoS::AtLeastOnce,
            false,
            refresh_request_json().into_bytes(),
        )
    }
}

/// Create the bridge and the event loop that drives it.
pub fn connect(config: &LinkConfig) -> (MqttBridge, EventLoop) {
    let mut options = MqttOptions::new(
        config.client_id.as_str(),
        config.host.as_str(),
        config.port,
    );
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

    let (client, eventloop) = AsyncClient::new(options, 10);
    (MqttBridge::new(client, config), eventloop)
}

// ============================================================================
// Link task
// ============================================================================

/// Turn a train-data payload into a face event.
pub fn decode_payload(payload: &[u8]) -> Event {
    let decoded = std::str::from_utf8(payload)
        .map_err(|e| e.to_string())
        .and_then(|text| InboundMessage::from_json(text).map_err(|e| e.to_string()));

    match decoded {
        Ok(msg) => Event::Inbox(msg),
        Err(error) => {
            tracing::warn!(%error, "undecodable train data");
            Event::InboxDropped(DeliveryFailure::Malformed)
        }
    }
}

/// Queue the train-data subscription. Failures are logged and the link keeps
/// running; the next reconnection tries again.
pub fn subscribe_trains(client: &AsyncClient, topic: &str) -> bool {
    match client.try_subscribe(topic, QoS::AtLeastOnce) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%error, topic, "train data subscription failed");
            false
        }
    }
}

/// Poll the MQTT event loop, forwarding link activity to the face.
///
/// Subscribes to the train topic on every (re)connection. Returns when the
/// face's event channel closes.
pub async fn run_link(
    mut eventloop: EventLoop,
    client: AsyncClient,
    config: LinkConfig,
    tx: EventSender,
) -> anyhow::Result<()> {
    let trains_topic = config.topic(TRAINS_TOPIC).as_str().to_string();
    let mut connected = false;

    tracing::info!(
        host = config.host.as_str(),
        port = config.port,
        topic = %trains_topic,
        "phone link starting"
    );

    loop {
        let event = match eventloop.poll().await {
            Ok(MqttEvent::Incoming(Packet::ConnAck(_))) => {
                subscribe_trains(&client, &trains_topic);
                connected = true;
                Some(Event::ConnectionChanged(true))
            }
            Ok(MqttEvent::Incoming(Packet::Publish(publish))) if publish.topic == trains_topic => {
                Some(decode_payload(&publish.payload))
            }
            Ok(MqttEvent::Incoming(Packet::PubAck(_))) => Some(Event::OutboxSent),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, "phone link error");
                let lost = connected.then_some(Event::ConnectionChanged(false));
                connected = false;
                if let Some(event) = lost {
                    if tx.send(event).is_err() {
                        return Ok(());
                    }
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
                None
            }
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                tracing::info!("face stopped, closing phone link");
                return Ok(());
            }
        }
    }
}
