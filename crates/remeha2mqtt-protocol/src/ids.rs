//! CAN arbitration identifiers broadcast by the appliance.
//!
//! The boiler shares its bus with other modules; everything not listed here
//! is ignored by the decoder.

/// Appliance date and time (millisecond-of-day + day count).
pub const ID_CLOCK: u32 = 0x100;

/// Relative burner power and flow temperature.
pub const ID_OPERATING: u32 = 0x282;

/// Flow temperature setpoint.
pub const ID_SETPOINT: u32 = 0x382;

/// Water pressure, announced by a marker frame (two-phase).
pub const ID_PRESSURE: u32 = 0x1C1;

/// Operating status code.
pub const ID_STATUS: u32 = 0x481;

/// Payload signature of a pressure marker frame (first three bytes).
pub const PRESSURE_MARKER: [u8; 3] = [0x41, 0x3F, 0x50];

/// Minimum payload length the decoder requires per identifier, or `None`
/// for identifiers it does not handle. The clock frame is exact-length;
/// the others are minimums.
pub fn min_payload_len(id: u32) -> Option<usize> {
    match id {
        ID_CLOCK => Some(6),
        ID_OPERATING => Some(5),
        ID_SETPOINT => Some(3),
        ID_PRESSURE => Some(8),
        ID_STATUS => Some(1),
        _ => None,
    }
}

/// Returns a human-readable name for a frame identifier.
pub fn frame_name(id: u32) -> &'static str {
    match id {
        ID_CLOCK => "CLOCK",
        ID_OPERATING => "OPERATING",
        ID_SETPOINT => "SETPOINT",
        ID_PRESSURE => "PRESSURE",
        ID_STATUS => "STATUS",
        _ => "UNKNOWN",
    }
}

/// Returns true if the decoder handles this identifier.
pub fn is_known(id: u32) -> bool {
    min_payload_len(id).is_some()
}
