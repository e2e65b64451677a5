use thiserror::Error;

/// A packet error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A packet error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// Attempting to view or build a packet with an insufficient buffer size.
    ///
    /// When decoding received data this means the data was truncated.
    #[error("insufficient buffer for {0} packet, minimum={1}, provided={2}")]
    InsufficientPacketBuffer(String, usize, usize),
    /// Attempting to build a packet which cannot be represented on the wire.
    #[error("{0} packet too large, maximum={1}, provided={2}")]
    PacketTooLarge(String, usize, usize),
    /// The packet is long enough but its content is inconsistent.
    #[error("malformed {0} packet: {1}")]
    MalformedPacket(String, String),
}

impl Error {
    /// Was the packet shorter than the minimum size for its type?
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::InsufficientPacketBuffer(..))
    }
}
