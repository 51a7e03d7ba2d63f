//! Remeha CAN frame decoding and measurement state tracking.
//!
//! This is the core of the bridge and it does no I/O. Raw bus frames go in,
//! typed measurement readings come out:
//!
//! - [`FrameDecoder`] turns one [`BusFrame`](remeha2mqtt_bus::BusFrame) into
//!   zero or more candidate [`Reading`]s. The only decode state carried
//!   across frames is the two-phase pressure handshake.
//! - [`StateStore`] remembers the last published value per measurement and
//!   applies each kind's [`PublishPolicy`] so unchanged values are not
//!   republished.
//!
//! Nothing here can fail: unknown identifiers and short payloads are normal
//! traffic on a shared appliance bus and decode to nothing.

pub mod decoder;
pub mod ids;
pub mod measurement;
pub mod status;
pub mod store;

pub use decoder::FrameDecoder;
pub use measurement::{MeasurementKind, PublishPolicy, Reading, DEADBAND_EPSILON};
pub use status::status_description;
pub use store::StateStore;
