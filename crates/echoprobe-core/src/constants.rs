/// The largest payload which can be carried by a single echo request.
///
/// An `IPv4` datagram is at most 65535 bytes which must hold the 20 byte
/// `IPv4` header and the 8 byte `ICMP` header.
pub const MAX_PAYLOAD_SIZE: usize = echoprobe_packet::echo::MAX_ECHO_PAYLOAD_SIZE;
