//! Operating status codes.
//!
//! The boiler reports a single status byte; this table maps the known codes
//! to short descriptions. Codes not listed here decode to `"unknown"`,
//! which is also the store's initial description.

/// Description text for unmapped status codes.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Returns the description for a status code.
pub fn status_description(code: u8) -> &'static str {
    match code {
        0 => "stand-by",
        1 => "demand",
        2 => "start generator",
        3 => "heat active",
        4 => "dhw active",
        5 => "stop generator",
        6 => "pump active",
        8 => "delay",
        9 => "block",
        10 => "lock",
        11 => "test heat min",
        12 => "test heat max",
        13 => "test DWH max",
        15 => "manual heat",
        16 => "frost protection",
        17 => "de-airation",
        18 => "controller temp protection",
        19 => "reset",
        20 => "auto filling",
        21 => "paused",
        200 => "service mode",
        _ => UNKNOWN_STATUS,
    }
}
