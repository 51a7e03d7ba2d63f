/// Errors that can occur on the CAN receive path.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Failed to open the named CAN interface.
    #[error("failed to open CAN interface {interface}: {source}")]
    Open {
        interface: String,
        source: std::io::Error,
    },

    /// An I/O error occurred while reading from the bus.
    #[error("bus read error: {0}")]
    Read(std::io::Error),
}

pub type Result<T> = std::result::Result<T, BusError>;
