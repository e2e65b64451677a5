use crate::error::{Error, Result};
use crate::net::socket::Socket;
use crate::net::Network;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::instrument;

/// A channel for sending and receiving `ICMP` messages over a raw socket.
pub struct Channel<S: Socket> {
    socket: S,
}

impl<S: Socket> Channel<S> {
    /// Create a channel for probing `target_addr`.
    ///
    /// Only `IPv4` targets are supported.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(level = "trace")]
    pub fn connect(target_addr: IpAddr) -> Result<Self> {
        match target_addr {
            IpAddr::V4(_) => Ok(Self::new(S::new_icmp_socket_ipv4()?)),
            IpAddr::V6(addr) => Err(Error::BadConfig(format!(
                "IPv6 target {addr} is not supported"
            ))),
        }
    }

    pub(crate) const fn new(socket: S) -> Self {
        Self { socket }
    }
}

impl<S: Socket> Network for Channel<S> {
    #[instrument(skip(self, buf), level = "trace")]
    fn send_to(&mut self, buf: &[u8], addr: IpAddr) -> Result<()> {
        self.socket
            .send_to(buf, SocketAddr::new(addr, 0))
            .map_err(Error::ProbeFailed)
    }

    #[instrument(skip(self, buf), level = "trace")]
    fn recv_from(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, IpAddr)>> {
        if !self.socket.is_readable(timeout)? {
            return Ok(None);
        }
        match self.socket.recv_from(buf) {
            Ok((bytes_read, Some(addr))) => Ok(Some((bytes_read, addr.ip()))),
            Ok((_, None)) => Err(Error::MissingAddr),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(Error::IoError(err)),
        }
    }
}
