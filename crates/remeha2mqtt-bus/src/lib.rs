//! SocketCAN receive transport for the Remeha bridge.
//!
//! The appliance broadcasts telemetry on its control bus; this crate opens a
//! SocketCAN interface and normalizes incoming data frames to [`BusFrame`]
//! values. Remote and error frames are skipped at this layer.
//!
//! This is the lowest layer. Frame decoding lives in `remeha2mqtt-protocol`
//! and never touches the socket.

pub mod can;
pub mod error;
pub mod frame;

pub use can::CanBus;
pub use error::{BusError, Result};
pub use frame::BusFrame;
