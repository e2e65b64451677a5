use crate::checksum::internet_checksum;
use crate::error::{Error, Result};
use crate::icmpv4::echo_reply::EchoReplyPacket;
use crate::icmpv4::echo_request::EchoRequestPacket;
use crate::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
use crate::ipv4::Ipv4Packet;
use crate::fmt_payload;
use std::fmt::{Debug, Formatter};

/// The largest `ICMP` message which can be carried by an `IPv4` datagram.
pub const MAX_ECHO_PACKET_SIZE: usize = u16::MAX as usize - Ipv4Packet::minimum_packet_size();

/// The largest echo payload which can be carried by an `IPv4` datagram.
pub const MAX_ECHO_PAYLOAD_SIZE: usize = MAX_ECHO_PACKET_SIZE - IcmpPacket::minimum_packet_size();

/// An owned `ICMPv4` echo request or echo reply message.
///
/// Unlike the packet views in [`crate::icmpv4`], an `EchoMessage` owns its
/// payload and can be built, compared and moved independently of any buffer.
///
/// # Example
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// use echoprobe_packet::echo::EchoMessage;
/// use echoprobe_packet::icmpv4::IcmpType;
///
/// let request = EchoMessage::request(1, 1, b"onditpainauchocolat".to_vec());
/// let bytes = request.encode_with_checksum()?;
/// assert_eq!([0xbe, 0x46], bytes[2..4]);
/// let decoded = EchoMessage::decode(&bytes)?;
/// assert_eq!(IcmpType::EchoRequest, decoded.icmp_type);
/// assert_eq!(0xbe46, decoded.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct EchoMessage {
    pub icmp_type: IcmpType,
    pub icmp_code: IcmpCode,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    pub payload: Vec<u8>,
}

impl EchoMessage {
    /// An echo request with a zero checksum.
    #[must_use]
    pub const fn request(identifier: u16, sequence: u16, payload: Vec<u8>) -> Self {
        Self {
            icmp_type: IcmpType::EchoRequest,
            icmp_code: IcmpCode(0),
            checksum: 0,
            identifier,
            sequence,
            payload,
        }
    }

    /// An echo reply with a zero checksum.
    #[must_use]
    pub const fn reply(identifier: u16, sequence: u16, payload: Vec<u8>) -> Self {
        Self {
            icmp_type: IcmpType::EchoReply,
            icmp_code: IcmpCode(0),
            checksum: 0,
            identifier,
            sequence,
            payload,
        }
    }

    /// The length of the message on the wire.
    #[must_use]
    pub fn packet_size(&self) -> usize {
        EchoRequestPacket::minimum_packet_size() + self.payload.len()
    }

    /// Encode the message exactly as it is, including the current `checksum`.
    ///
    /// Fails if the message is too large to be carried by an `IPv4` datagram.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let packet_size = self.packet_size();
        if packet_size > MAX_ECHO_PACKET_SIZE {
            return Err(Error::PacketTooLarge(
                String::from("EchoMessage"),
                MAX_ECHO_PACKET_SIZE,
                packet_size,
            ));
        }
        let mut buf = vec![0_u8; packet_size];
        let mut packet = EchoRequestPacket::new(&mut buf)?;
        packet.set_icmp_type(self.icmp_type);
        packet.set_icmp_code(self.icmp_code);
        packet.set_checksum(self.checksum);
        packet.set_identifier(self.identifier);
        packet.set_sequence(self.sequence);
        packet.set_payload(&self.payload);
        Ok(buf)
    }

    /// Encode the message with a freshly computed checksum.
    ///
    /// The message is encoded with a zero checksum, the checksum is computed
    /// over those bytes and the message is then encoded again with it.
    pub fn encode_with_checksum(&self) -> Result<Vec<u8>> {
        let unchecked = Self {
            checksum: 0,
            ..self.clone()
        };
        let checksum = internet_checksum(&unchecked.encode()?);
        Self {
            checksum,
            ..unchecked
        }
        .encode()
    }

    /// Decode a message from the bytes of an `ICMP` packet.
    ///
    /// Any message of at least 8 bytes is decoded, whatever its type. Echo
    /// replies are read through [`EchoReplyPacket`] and every other type
    /// through the request layout. The checksum is not verified.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        macro_rules! from_view {
            ($packet:expr) => {{
                let packet = $packet;
                Self {
                    icmp_type: packet.get_icmp_type(),
                    icmp_code: packet.get_icmp_code(),
                    checksum: packet.get_checksum(),
                    identifier: packet.get_identifier(),
                    sequence: packet.get_sequence(),
                    payload: packet.payload().to_vec(),
                }
            }};
        }
        match IcmpPacket::new_view(bytes)?.get_icmp_type() {
            IcmpType::EchoReply => Ok(from_view!(EchoReplyPacket::new_view(bytes)?)),
            _ => Ok(from_view!(EchoRequestPacket::new_view(bytes)?)),
        }
    }

    /// Is this an echo reply to the request with the given identifier?
    #[must_use]
    pub fn is_reply_to(&self, identifier: u16) -> bool {
        self.icmp_type == IcmpType::EchoReply && self.identifier == identifier
    }
}

impl Debug for EchoMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoMessage")
            .field("icmp_type", &self.icmp_type)
            .field("icmp_code", &self.icmp_code)
            .field("checksum", &self.checksum)
            .field("identifier", &self.identifier)
            .field("sequence", &self.sequence)
            .field("payload", &fmt_payload(&self.payload))
            .finish()
    }
}
