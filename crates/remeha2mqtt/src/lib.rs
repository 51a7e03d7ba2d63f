//! Remeha boiler CAN bus to MQTT bridge.
//!
//! remeha2mqtt listens on a SocketCAN interface, decodes the telemetry the
//! boiler broadcasts, and republishes changed readings as retained MQTT
//! messages with Home Assistant discovery metadata.
//!
//! # Crate Structure
//!
//! - [`bus`] — SocketCAN receive transport (Linux only)
//! - [`protocol`] — Frame decoding and measurement state tracking (no I/O)
//! - [`publish`] — MQTT publication and Home Assistant discovery
//!
//! The CLI binary of the same name wires these together; see `remeha2mqtt
//! run --help`.

/// Re-export bus transport types.
pub mod bus {
    pub use remeha2mqtt_bus::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use remeha2mqtt_protocol::*;
}

/// Re-export MQTT publication types.
pub mod publish {
    pub use remeha2mqtt_publish::*;
}
