use crate::buffer::Buffer;
use crate::error::{Error, Result};
use std::fmt::{Debug, Formatter};

/// The type of `ICMPv4` packet.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    TimeExceeded,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::EchoReply => 0,
            Self::DestinationUnreachable => 3,
            Self::EchoRequest => 8,
            Self::TimeExceeded => 11,
            Self::Other(id) => *id,
        }
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::EchoReply,
            3 => Self::DestinationUnreachable,
            8 => Self::EchoRequest,
            11 => Self::TimeExceeded,
            id => Self::Other(id),
        }
    }
}

/// The `ICMPv4` code.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;
const IDENTIFIER_OFFSET: usize = 4;
const SEQUENCE_OFFSET: usize = 6;

fn check_size<'a>(name: &str, packet: Buffer<'a>, minimum: usize) -> Result<Buffer<'a>> {
    let provided = packet.as_slice().len();
    if provided >= minimum {
        Ok(packet)
    } else {
        Err(Error::InsufficientPacketBuffer(
            String::from(name),
            minimum,
            provided,
        ))
    }
}

/// Represents a generic `ICMPv4` packet.
///
/// Only the fields common to all `ICMP` messages are accessible. The internal
/// representation is held in network byte order (big-endian) and all accessor
/// methods take and return data in host byte order.
pub struct IcmpPacket<'a> {
    buf: Buffer<'a>,
}

impl<'a> IcmpPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        let buf = check_size("IcmpPacket", Buffer::Mutable(packet), Self::minimum_packet_size())?;
        Ok(Self { buf })
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        let buf = check_size(
            "IcmpPacket",
            Buffer::Immutable(packet),
            Self::minimum_packet_size(),
        )?;
        Ok(Self { buf })
    }

    /// The size of the `ICMP` header shared by all messages this crate handles.
    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        8
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.read(TYPE_OFFSET))
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.buf.read(CODE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }

    pub fn set_icmp_type(&mut self, val: IcmpType) {
        *self.buf.write(TYPE_OFFSET) = val.id();
    }

    pub fn set_icmp_code(&mut self, val: IcmpCode) {
        *self.buf.write(CODE_OFFSET) = val.0;
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.write_u16(CHECKSUM_OFFSET, val);
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

impl Debug for IcmpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpPacket")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum())
            .finish()
    }
}

/// Generate a view type for an `ICMP` echo message.
///
/// Echo requests and echo replies share a single layout and differ only in
/// the value of the type field.
macro_rules! echo_packet {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<'a> {
            buf: Buffer<'a>,
        }

        impl<'a> $name<'a> {
            pub fn new(packet: &'a mut [u8]) -> Result<Self> {
                let buf = check_size(
                    stringify!($name),
                    Buffer::Mutable(packet),
                    Self::minimum_packet_size(),
                )?;
                Ok(Self { buf })
            }

            pub fn new_view(packet: &'a [u8]) -> Result<Self> {
                let buf = check_size(
                    stringify!($name),
                    Buffer::Immutable(packet),
                    Self::minimum_packet_size(),
                )?;
                Ok(Self { buf })
            }

            #[must_use]
            pub const fn minimum_packet_size() -> usize {
                8
            }

            #[must_use]
            pub fn get_icmp_type(&self) -> IcmpType {
                IcmpType::from(self.buf.read(TYPE_OFFSET))
            }

            #[must_use]
            pub fn get_icmp_code(&self) -> IcmpCode {
                IcmpCode::from(self.buf.read(CODE_OFFSET))
            }

            #[must_use]
            pub fn get_checksum(&self) -> u16 {
                self.buf.read_u16(CHECKSUM_OFFSET)
            }

            #[must_use]
            pub fn get_identifier(&self) -> u16 {
                self.buf.read_u16(IDENTIFIER_OFFSET)
            }

            #[must_use]
            pub fn get_sequence(&self) -> u16 {
                self.buf.read_u16(SEQUENCE_OFFSET)
            }

            pub fn set_icmp_type(&mut self, val: IcmpType) {
                *self.buf.write(TYPE_OFFSET) = val.id();
            }

            pub fn set_icmp_code(&mut self, val: IcmpCode) {
                *self.buf.write(CODE_OFFSET) = val.0;
            }

            pub fn set_checksum(&mut self, val: u16) {
                self.buf.write_u16(CHECKSUM_OFFSET, val);
            }

            pub fn set_identifier(&mut self, val: u16) {
                self.buf.write_u16(IDENTIFIER_OFFSET, val);
            }

            pub fn set_sequence(&mut self, val: u16) {
                self.buf.write_u16(SEQUENCE_OFFSET, val);
            }

            /// Copy `vals` into the payload.
            ///
            /// # Panics
            ///
            /// Panics if the buffer is too small to hold the payload.
            pub fn set_payload(&mut self, vals: &[u8]) {
                let offset = Self::minimum_packet_size();
                self.buf.as_slice_mut()[offset..offset + vals.len()].copy_from_slice(vals);
            }

            #[must_use]
            pub fn packet(&self) -> &[u8] {
                self.buf.as_slice()
            }

            #[must_use]
            pub fn payload(&self) -> &[u8] {
                self.buf.tail(Self::minimum_packet_size())
            }
        }

        impl Debug for $name<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("icmp_type", &self.get_icmp_type())
                    .field("icmp_code", &self.get_icmp_code())
                    .field("checksum", &self.get_checksum())
                    .field("identifier", &self.get_identifier())
                    .field("sequence", &self.get_sequence())
                    .field("payload", &crate::fmt_payload(self.payload()))
                    .finish()
            }
        }
    };
}

pub mod echo_request {
    use super::{check_size, IcmpCode, IcmpType};
    use super::{CHECKSUM_OFFSET, CODE_OFFSET, IDENTIFIER_OFFSET, SEQUENCE_OFFSET, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use std::fmt::{Debug, Formatter};

    echo_packet! {
        /// Represents an `ICMPv4` `EchoRequest` packet.
        ///
        /// The internal representation is held in network byte order (big-endian) and all
        /// accessor methods take and return data in host byte order.
        EchoRequestPacket
    }
}

pub mod echo_reply {
    use super::{check_size, IcmpCode, IcmpType};
    use super::{CHECKSUM_OFFSET, CODE_OFFSET, IDENTIFIER_OFFSET, SEQUENCE_OFFSET, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use std::fmt::{Debug, Formatter};

    echo_packet! {
        /// Represents an `ICMPv4` `EchoReply` packet.
        ///
        /// The internal representation is held in network byte order (big-endian) and all
        /// accessor methods take and return data in host byte order.
        EchoReplyPacket
    }
}

#[cfg(test)]
mod tests {
    use super::echo_reply::EchoReplyPacket;
    use super::echo_request::EchoRequestPacket;
    use super::*;
    use crate::checksum::icmp_ipv4_checksum;
    use test_case::test_case;

    #[test_case(IcmpType::EchoReply, 0x00)]
    #[test_case(IcmpType::DestinationUnreachable, 0x03)]
    #[test_case(IcmpType::EchoRequest, 0x08)]
    #[test_case(IcmpType::TimeExceeded, 0x0b)]
    #[test_case(IcmpType::Other(255), 0xff)]
    fn test_icmp_type(icmp_type: IcmpType, id: u8) {
        let mut buf = [0_u8; IcmpPacket::minimum_packet_size()];
        let mut packet = IcmpPacket::new(&mut buf).unwrap();
        packet.set_icmp_type(icmp_type);
        assert_eq!(icmp_type, packet.get_icmp_type());
        assert_eq!([id], packet.packet()[0..1]);
        assert_eq!(icmp_type, IcmpType::from(id));
    }

    #[test]
    fn test_icmp_code() {
        let mut buf = [0_u8; IcmpPacket::minimum_packet_size()];
        let mut packet = IcmpPacket::new(&mut buf).unwrap();
        packet.set_icmp_code(IcmpCode(0));
        assert_eq!(IcmpCode(0), packet.get_icmp_code());
        packet.set_icmp_code(IcmpCode(255));
        assert_eq!(IcmpCode(255), packet.get_icmp_code());
        assert_eq!([0xFF], packet.packet()[1..2]);
    }

    #[test]
    fn test_new_view_insufficient_buffer() {
        const SIZE: usize = IcmpPacket::minimum_packet_size();
        let buf = [0_u8; SIZE - 1];
        let err = IcmpPacket::new_view(&buf).unwrap_err();
        assert_eq!(
            Error::InsufficientPacketBuffer(String::from("IcmpPacket"), SIZE, SIZE - 1),
            err
        );
        assert!(err.is_truncated());
    }

    #[test]
    fn test_echo_request_fields() {
        let mut buf = [0_u8; 10];
        let mut packet = EchoRequestPacket::new(&mut buf).unwrap();
        packet.set_icmp_type(IcmpType::EchoRequest);
        packet.set_icmp_code(IcmpCode(0));
        packet.set_identifier(1234);
        packet.set_sequence(10);
        packet.set_payload(&[0xde, 0xad]);
        packet.set_checksum(icmp_ipv4_checksum(packet.packet()));
        assert_eq!(1234, packet.get_identifier());
        assert_eq!(10, packet.get_sequence());
        assert_eq!(&[0xde, 0xad], packet.payload());
        assert_eq!(
            &hex_literal::hex!("08 00 14 76 04 d2 00 0a de ad"),
            packet.packet()
        );
    }

    #[test]
    fn test_echo_reply_view() {
        let buf = hex_literal::hex!("00 00 ed ca 12 34 00 01");
        let packet = EchoReplyPacket::new_view(&buf).unwrap();
        assert_eq!(IcmpType::EchoReply, packet.get_icmp_type());
        assert_eq!(IcmpCode(0), packet.get_icmp_code());
        assert_eq!(0xedca, packet.get_checksum());
        assert_eq!(0x1234, packet.get_identifier());
        assert_eq!(1, packet.get_sequence());
        assert!(packet.payload().is_empty());
    }

    #[test]
    fn test_echo_reply_insufficient_buffer() {
        let buf = [0_u8; 7];
        let err = EchoReplyPacket::new_view(&buf).unwrap_err();
        assert_eq!(
            Error::InsufficientPacketBuffer(String::from("EchoReplyPacket"), 8, 7),
            err
        );
    }

    #[test]
    fn test_debug() {
        let buf = hex_literal::hex!("08 00 be 46 00 01 00 01 6f 6e");
        let packet = EchoRequestPacket::new_view(&buf).unwrap();
        assert_eq!(
            "EchoRequestPacket { icmp_type: EchoRequest, icmp_code: IcmpCode(0), checksum: 48710, identifier: 1, sequence: 1, payload: \"6f 6e\" }",
            format!("{packet:?}")
        );
    }
}
