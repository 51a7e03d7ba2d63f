use bytes::Bytes;

/// Maximum payload length of a classic CAN data frame.
pub const MAX_FRAME_DATA: usize = 8;

/// One received bus frame: arbitration identifier plus payload bytes.
///
/// Frames are ephemeral; the decoder borrows one, extracts what it needs,
/// and the frame is dropped before the next receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFrame {
    /// The CAN arbitration identifier.
    pub id: u32,
    /// The payload (0 to 8 bytes on a classic CAN bus).
    pub data: Bytes,
}

impl BusFrame {
    /// Create a new frame.
    pub fn new(id: u32, data: impl Into<Bytes>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
