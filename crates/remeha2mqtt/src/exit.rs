use std::fmt;
use std::io;

use remeha2mqtt_bus::BusError;
use remeha2mqtt_publish::PublishError;

use crate::config::ConfigError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
#[allow(dead_code)]
pub const USAGE: i32 = 64;
pub const CONFIG_ERROR: i32 = 71;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn config_error(context: &str, err: ConfigError) -> CliError {
    CliError::new(CONFIG_ERROR, format!("{context}: {err}"))
}

pub fn bus_error(context: &str, err: BusError) -> CliError {
    let code = match &err {
        BusError::Open { source, .. } | BusError::Read(source) => io_code(source),
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn publish_error(context: &str, err: PublishError) -> CliError {
    let code = match &err {
        PublishError::Connection(_) | PublishError::Client(_) => TRANSPORT_ERROR,
        PublishError::Json(_) => DATA_INVALID,
        PublishError::Spawn(_) => INTERNAL,
        PublishError::Disconnected => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    }
}
