use crate::error::IoResult as Result;
use std::net::SocketAddr;
use std::time::Duration;

/// A low level datagram socket.
#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create a non-blocking raw IPv4 socket for sending and receiving `ICMP` messages.
    fn new_icmp_socket_ipv4() -> Result<Self>;
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<()>;
    /// Returns true if the socket becomes readable before the timeout, false otherwise.
    fn is_readable(&mut self, timeout: Duration) -> Result<bool>;
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, Option<SocketAddr>)>;
}

#[cfg(test)]
pub mod tests {
    #[macro_export]
    macro_rules! mocket_recv_from {
        ($packet: expr, $addr: expr) => {
            move |buf: &mut [u8]| -> IoResult<(usize, Option<SocketAddr>)> {
                buf[..$packet.len()].copy_from_slice(&$packet);
                Ok(($packet.len(), Some($addr)))
            }
        };
    }
}
