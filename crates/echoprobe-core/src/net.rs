use crate::error::Result;
use std::net::IpAddr;
use std::time::Duration;

/// Platform specific network code.
mod platform;

/// A network socket.
pub mod socket;

/// A channel for sending and receiving `ICMP` messages.
pub mod channel;

/// The platform specific socket type.
pub use platform::SocketImpl;

/// An abstraction over a datagram transport for sending and receiving `ICMP` messages.
///
/// Implementations deliver whole datagrams. Raw `IPv4` sockets deliver each
/// `ICMP` message with its `IPv4` header still attached, the caller is
/// expected to strip it.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send a datagram to `addr`.
    ///
    /// A failure to send is reported as [`Error::ProbeFailed`](crate::Error::ProbeFailed).
    fn send_to(&mut self, buf: &[u8], addr: IpAddr) -> Result<()>;

    /// Wait up to `timeout` for the next datagram and read it into `buf`.
    ///
    /// Returns the number of bytes read and the address of the sender, or
    /// `None` if no datagram arrived before the timeout.
    fn recv_from(&mut self, buf: &mut [u8], timeout: Duration)
        -> Result<Option<(usize, IpAddr)>>;
}
