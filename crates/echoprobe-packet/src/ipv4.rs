use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::{fmt_payload, IpProtocol};
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

const VERSION_OFFSET: usize = 0;
const IHL_OFFSET: usize = 0;
const TOS_OFFSET: usize = 1;
const TOTAL_LENGTH_OFFSET: usize = 2;
const TIME_TO_LIVE_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SOURCE_OFFSET: usize = 12;
const DESTINATION_OFFSET: usize = 16;

/// Represents an `IPv4` header and the data which follows it.
///
/// Raw `ICMP` sockets deliver each received message wrapped in the `IPv4`
/// header it arrived with, this view allows that header to be inspected and
/// skipped.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order.
pub struct Ipv4Packet<'a> {
    buf: Buffer<'a>,
}

impl<'a> Ipv4Packet<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        if packet.len() >= Self::minimum_packet_size() {
            Ok(Self {
                buf: Buffer::Mutable(packet),
            })
        } else {
            Err(Error::InsufficientPacketBuffer(
                String::from("Ipv4Packet"),
                Self::minimum_packet_size(),
                packet.len(),
            ))
        }
    }

    /// Create a read-only view, checking that the header is consistent.
    ///
    /// The version must be 4 and the header length must be at least the minimum header size and
    /// no longer than the data provided.
    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        if packet.len() < Self::minimum_packet_size() {
            return Err(Error::InsufficientPacketBuffer(
                String::from("Ipv4Packet"),
                Self::minimum_packet_size(),
                packet.len(),
            ));
        }
        let ipv4 = Self {
            buf: Buffer::Immutable(packet),
        };
        let version = ipv4.get_version();
        let header_len = ipv4.header_len();
        if version != 4 {
            Err(Error::MalformedPacket(
                String::from("Ipv4Packet"),
                format!("unexpected version {version}"),
            ))
        } else if header_len < Self::minimum_packet_size() {
            Err(Error::MalformedPacket(
                String::from("Ipv4Packet"),
                format!("header length {header_len} below minimum"),
            ))
        } else if header_len > packet.len() {
            Err(Error::MalformedPacket(
                String::from("Ipv4Packet"),
                format!("header length {header_len} exceeds packet length {}", packet.len()),
            ))
        } else {
            Ok(ipv4)
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        20
    }

    /// Does the data start with what looks like an `IPv4` header?
    ///
    /// Only the version nibble is inspected. No `ICMP` message type this crate
    /// handles has a first byte in the range `0x40..=0x4f`.
    #[must_use]
    pub fn is_ipv4(data: &[u8]) -> bool {
        data.first().is_some_and(|b| b >> 4 == 4)
    }

    #[must_use]
    pub fn get_version(&self) -> u8 {
        (self.buf.read(VERSION_OFFSET) & 0xf0) >> 4
    }

    /// The header length field, in 32-bit words.
    #[must_use]
    pub fn get_header_length(&self) -> u8 {
        self.buf.read(IHL_OFFSET) & 0xf
    }

    /// The header length, in bytes.
    #[must_use]
    pub fn header_len(&self) -> usize {
        usize::from(self.get_header_length()) * 4
    }

    #[must_use]
    pub fn get_tos(&self) -> u8 {
        self.buf.read(TOS_OFFSET)
    }

    #[must_use]
    pub fn get_total_length(&self) -> u16 {
        self.buf.read_u16(TOTAL_LENGTH_OFFSET)
    }

    #[must_use]
    pub fn get_ttl(&self) -> u8 {
        self.buf.read(TIME_TO_LIVE_OFFSET)
    }

    #[must_use]
    pub fn get_protocol(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(PROTOCOL_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }

    #[must_use]
    pub fn get_source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes::<4>(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes::<4>(DESTINATION_OFFSET))
    }

    pub fn set_version(&mut self, val: u8) {
        *self.buf.write(VERSION_OFFSET) =
            (self.buf.read(VERSION_OFFSET) & 0xf) | ((val & 0xf) << 4);
    }

    pub fn set_header_length(&mut self, val: u8) {
        *self.buf.write(IHL_OFFSET) = (self.buf.read(IHL_OFFSET) & 0xf0) | (val & 0xf);
    }

    pub fn set_tos(&mut self, val: u8) {
        *self.buf.write(TOS_OFFSET) = val;
    }

    pub fn set_total_length(&mut self, val: u16) {
        self.buf.write_u16(TOTAL_LENGTH_OFFSET, val);
    }

    pub fn set_ttl(&mut self, val: u8) {
        *self.buf.write(TIME_TO_LIVE_OFFSET) = val;
    }

    pub fn set_protocol(&mut self, val: IpProtocol) {
        *self.buf.write(PROTOCOL_OFFSET) = val.id();
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.write_u16(CHECKSUM_OFFSET, val);
    }

    pub fn set_source(&mut self, val: Ipv4Addr) {
        self.buf.as_slice_mut()[SOURCE_OFFSET..SOURCE_OFFSET + 4].copy_from_slice(&val.octets());
    }

    pub fn set_destination(&mut self, val: Ipv4Addr) {
        self.buf.as_slice_mut()[DESTINATION_OFFSET..DESTINATION_OFFSET + 4]
            .copy_from_slice(&val.octets());
    }

    /// Copy `vals` after the header.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is too small to hold the header and payload.
    pub fn set_payload(&mut self, vals: &[u8]) {
        let offset = self.header_len();
        self.buf.as_slice_mut()[offset..offset + vals.len()].copy_from_slice(vals);
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// The data following the header, including any header options.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.buf.tail(self.header_len())
    }
}

impl Debug for Ipv4Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv4Packet")
            .field("version", &self.get_version())
            .field("header_length", &self.get_header_length())
            .field("tos", &self.get_tos())
            .field("total_length", &self.get_total_length())
            .field("ttl", &self.get_ttl())
            .field("protocol", &self.get_protocol())
            .field("checksum", &self.get_checksum())
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
