//! MQTT publication layer.
//!
//! Accepted readings leave the process here: every measurement goes to its
//! `remeha/<name>` state topic as a retained message, so a subscriber that
//! connects later still sees the last known value. [`MqttPublisher`] wraps
//! the blocking rumqttc client; a background thread keeps the connection
//! alive and reconnects after broker hiccups.
//!
//! The [`discovery`] module renders the static Home Assistant discovery
//! payloads that make the sensors appear without manual configuration.

pub mod config;
pub mod discovery;
pub mod error;
pub mod publisher;

pub use config::BrokerConfig;
pub use error::{PublishError, Result};
pub use publisher::MqttPublisher;
