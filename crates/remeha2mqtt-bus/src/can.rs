use std::io::ErrorKind;
use std::time::Duration;

use bytes::Bytes;
use socketcan::{CanFrame, CanSocket, EmbeddedFrame, Id, Socket};
use tracing::{debug, info};

use crate::error::{BusError, Result};
use crate::frame::BusFrame;

/// Blocking receive handle on a SocketCAN interface.
///
/// The appliance is a broadcast source, so there is no send side. Only data
/// frames are surfaced; remote and error frames read from the socket are
/// reported as "no frame" and the caller retries.
pub struct CanBus {
    socket: CanSocket,
    interface: String,
}

impl CanBus {
    /// Open the named SocketCAN interface (e.g. `can0`).
    pub fn open(interface: &str) -> Result<Self> {
        let socket = CanSocket::open(interface).map_err(|source| BusError::Open {
            interface: interface.to_string(),
            source,
        })?;
        info!(interface, "listening on CAN interface");
        Ok(Self {
            socket,
            interface: interface.to_string(),
        })
    }

    /// Receive the next data frame, blocking until one arrives.
    ///
    /// `Ok(None)` means the read produced nothing usable: a remote or error
    /// frame, or a read interrupted by a signal.
    pub fn recv(&self) -> Result<Option<BusFrame>> {
        match self.socket.read_frame() {
            Ok(frame) => Ok(Self::data_frame(frame)),
            Err(err) if Self::is_retryable(&err) => Ok(None),
            Err(err) => Err(BusError::Read(err)),
        }
    }

    /// Receive with a timeout; `Ok(None)` when it elapses without a data frame.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<BusFrame>> {
        match self.socket.read_frame_timeout(timeout) {
            Ok(frame) => Ok(Self::data_frame(frame)),
            Err(err) if Self::is_retryable(&err) => Ok(None),
            Err(err) => Err(BusError::Read(err)),
        }
    }

    /// The interface name this handle reads from.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    fn data_frame(frame: CanFrame) -> Option<BusFrame> {
        match frame {
            CanFrame::Data(frame) => {
                let id = match frame.id() {
                    Id::Standard(id) => u32::from(id.as_raw()),
                    Id::Extended(id) => id.as_raw(),
                };
                Some(BusFrame::new(id, Bytes::copy_from_slice(frame.data())))
            }
            CanFrame::Remote(_) | CanFrame::Error(_) => {
                debug!("skipping non-data frame");
                None
            }
        }
    }

    fn is_retryable(err: &std::io::Error) -> bool {
        matches!(
            err.kind(),
            ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
        )
    }
}
