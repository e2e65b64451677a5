//! `ICMPv4` echo packet wire format parsing and building.
//!
//! The following are supported:
//! - `ICMPv4` echo request and echo reply packets
//! - the `IPv4` header which wraps `ICMP` messages read from raw sockets
//! - the Internet checksum
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example builds an `ICMPv4` echo request packet in place:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use echoprobe_packet::checksum::icmp_ipv4_checksum;
//! use echoprobe_packet::icmpv4::echo_request::EchoRequestPacket;
//! use echoprobe_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
//!
//! let mut buf = [0; IcmpPacket::minimum_packet_size()];
//! let mut icmp = EchoRequestPacket::new(&mut buf)?;
//! icmp.set_icmp_type(IcmpType::EchoRequest);
//! icmp.set_icmp_code(IcmpCode(0));
//! icmp.set_identifier(1234);
//! icmp.set_sequence(10);
//! icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
//! assert_eq!(icmp.packet(), &hex_literal::hex!("08 00 f3 23 04 d2 00 0a"));
//! # Ok(())
//! # }
//! ```
//!
//! The following example decodes an echo reply and verifies its checksum:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use echoprobe_packet::checksum::verify_checksum;
//! use echoprobe_packet::echo::EchoMessage;
//!
//! let buf = hex_literal::hex!("00 00 ed ca 12 34 00 01");
//! let reply = EchoMessage::decode(&buf)?;
//! assert!(reply.is_reply_to(0x1234));
//! assert!(verify_checksum(&buf));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod buffer;

/// Packet errors.
pub mod error;

/// Functions for calculating network checksums.
pub mod checksum;

/// Owned echo messages.
pub mod echo;

/// `ICMPv4` packets.
pub mod icmpv4;

/// `IPv4` packets.
pub mod ipv4;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Other(id) => id,
        }
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}
