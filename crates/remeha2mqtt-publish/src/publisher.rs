use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use remeha2mqtt_protocol::Reading;

use crate::config::BrokerConfig;
use crate::discovery;
use crate::error::{PublishError, Result};

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
/// Request queue capacity between publisher and connection driver.
const EVENT_CAPACITY: usize = 32;

/// Blocking MQTT publisher.
///
/// `connect` waits for the broker's CONNACK before returning, so an
/// unreachable broker fails startup instead of retrying invisibly. After
/// that a background thread drives the connection and re-establishes it
/// when the broker drops; publishes made in the meantime queue up.
///
/// Every publish is retained: topics always carry the last known value
/// for subscribers that connect later.
pub struct MqttPublisher {
    client: Client,
    shutdown: Arc<AtomicBool>,
    driver: Option<JoinHandle<()>>,
}

impl MqttPublisher {
    /// Connect to the broker and start the connection driver thread.
    pub fn connect(config: &BrokerConfig) -> Result<Self> {
        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(KEEP_ALIVE);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, mut connection) = Client::new(options, EVENT_CAPACITY);
        wait_for_connack(&mut connection)?;
        info!(host = %config.host, port = config.port, "connected to mqtt broker");

        let shutdown = Arc::new(AtomicBool::new(false));
        let driver = thread::Builder::new()
            .name("mqtt-driver".to_string())
            .spawn({
                let shutdown = Arc::clone(&shutdown);
                move || drive(connection, &shutdown)
            })
            .map_err(PublishError::Spawn)?;

        Ok(Self {
            client,
            shutdown,
            driver: Some(driver),
        })
    }

    /// Publish one reading to its state topic, retained.
    pub fn publish_reading(&self, reading: &Reading) -> Result<()> {
        let topic = discovery::state_topic(reading.kind());
        let payload = reading.payload();
        debug!(topic = %topic, payload = %payload, "publishing reading");
        self.client
            .publish(topic, QoS::AtMostOnce, true, payload)?;
        Ok(())
    }

    /// Publish the discovery payload for every sensor, retained.
    pub fn publish_discovery(&self) -> Result<()> {
        for meta in &discovery::SENSORS {
            let topic = discovery::discovery_topic(meta.kind);
            let payload = discovery::discovery_payload(meta)?;
            debug!(topic = %topic, "publishing discovery payload");
            self.client.publish(topic, QoS::AtMostOnce, true, payload)?;
        }
        Ok(())
    }

    /// Flush outstanding publishes and tear the connection down.
    pub fn disconnect(&mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.client.disconnect()?;
        if let Some(driver) = self.driver.take() {
            let _ = driver.join();
        }
        Ok(())
    }
}

impl Drop for MqttPublisher {
    fn drop(&mut self) {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            let _ = self.client.disconnect();
        }
    }
}

/// Block until the broker acknowledges the session.
fn wait_for_connack(connection: &mut Connection) -> Result<()> {
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                debug!(code = ?ack.code, "broker acknowledged session");
                return Ok(());
            }
            Ok(_) => continue,
            Err(err) => return Err(PublishError::Connection(err)),
        }
    }
    Err(PublishError::Disconnected)
}

/// Drive the connection until shutdown: keep-alives, acknowledgements and
/// reconnects all happen inside the event iterator.
fn drive(mut connection: Connection, shutdown: &AtomicBool) {
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("reconnected to mqtt broker");
            }
            Ok(_) => {}
            Err(err) => {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                warn!(error = %err, "mqtt connection lost, retrying");
                thread::sleep(RECONNECT_DELAY);
            }
        }
    }
    debug!("mqtt driver stopped");
}
