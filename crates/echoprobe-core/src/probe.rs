use crate::config::ProbeConfig;
use crate::error::Result;
use crate::net::Network;
use crate::types::{Sequence, TraceId};
use echoprobe_packet::echo::EchoMessage;
use echoprobe_packet::ipv4::Ipv4Packet;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::instrument;

/// The size of the buffer used to receive datagrams.
const MAX_PACKET_SIZE: usize = u16::MAX as usize;

/// The outcome of a probe.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProbeResult {
    /// A matching echo reply was received.
    Success {
        /// The time between sending the request and receiving the reply.
        round_trip: Duration,
        /// The address the reply was received from.
        responder_addr: IpAddr,
    },
    /// No matching echo reply was received before the timeout.
    Timeout,
}

impl ProbeResult {
    /// The round trip time in fractional milliseconds, if the probe succeeded.
    #[must_use]
    pub fn round_trip_millis(&self) -> Option<f64> {
        match self {
            Self::Success { round_trip, .. } => Some(round_trip.as_secs_f64() * 1000_f64),
            Self::Timeout => None,
        }
    }
}

/// Send a single echo request to `destination` and wait up to `timeout` for the matching reply.
///
/// Received messages which cannot be decoded, which are not echo replies or
/// which carry a different identifier are discarded and the wait continues
/// with whatever remains of `timeout`.
///
/// Returns [`ProbeResult::Timeout`] if no matching reply arrives in time. A
/// failure to send the request is reported as
/// [`Error::ProbeFailed`](crate::Error::ProbeFailed).
///
/// # Example
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use echoprobe_core::{probe, Channel, ProbeResult, Sequence, SocketImpl, TraceId};
/// use std::net::IpAddr;
/// use std::time::Duration;
///
/// let addr = IpAddr::from([1, 1, 1, 1]);
/// let mut channel = Channel::<SocketImpl>::connect(addr)?;
/// let result = probe(
///     &mut channel,
///     addr,
///     TraceId(1),
///     Sequence(1),
///     b"hello",
///     Duration::from_secs(1),
/// )?;
/// if let ProbeResult::Success { round_trip, .. } = result {
///     println!("{round_trip:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[instrument(skip(network, payload), level = "trace")]
pub fn probe<N: Network>(
    network: &mut N,
    destination: IpAddr,
    identifier: TraceId,
    sequence: Sequence,
    payload: &[u8],
    timeout: Duration,
) -> Result<ProbeResult> {
    let request = EchoMessage::request(identifier.0, sequence.0, payload.to_vec());
    let packet = request.encode_with_checksum()?;
    let send_time = Instant::now();
    network.send_to(&packet, destination)?;
    let deadline = send_time + timeout;
    let mut buf = vec![0_u8; MAX_PACKET_SIZE];
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(ProbeResult::Timeout);
        }
        let Some((bytes_read, addr)) = network.recv_from(&mut buf, remaining)? else {
            continue;
        };
        let recv_time = Instant::now();
        match extract_echo(&buf[..bytes_read]) {
            Ok(reply) if reply.is_reply_to(identifier.0) => {
                tracing::debug!(?reply, %addr, "received matching echo reply");
                return Ok(ProbeResult::Success {
                    round_trip: recv_time.saturating_duration_since(send_time),
                    responder_addr: addr,
                });
            }
            Ok(message) => tracing::debug!(?message, %addr, "discarding unmatched icmp message"),
            Err(err) => tracing::debug!(%err, %addr, "discarding malformed icmp message"),
        }
    }
}

/// Decode an `ICMP` message, skipping the `IPv4` header if one is present.
fn extract_echo(data: &[u8]) -> echoprobe_packet::error::Result<EchoMessage> {
    if Ipv4Packet::is_ipv4(data) {
        let ipv4 = Ipv4Packet::new_view(data)?;
        EchoMessage::decode(ipv4.payload())
    } else {
        EchoMessage::decode(data)
    }
}

/// Sends echo requests over a [`Network`] using a fixed [`ProbeConfig`].
///
/// See [`Builder`](crate::Builder) for building a `Prober` over a raw socket.
#[derive(Debug)]
pub struct Prober<N: Network> {
    network: N,
    config: ProbeConfig,
}

impl<N: Network> Prober<N> {
    /// Create a `Prober` from an existing network and config.
    ///
    /// The config is not validated, use [`Builder`](crate::Builder) for that.
    #[must_use]
    pub const fn new(network: N, config: ProbeConfig) -> Self {
        Self { network, config }
    }

    /// Send an echo request and wait for the matching reply.
    pub fn probe(&mut self) -> Result<ProbeResult> {
        probe(
            &mut self.network,
            self.config.target_addr,
            self.config.identifier,
            self.config.sequence,
            &self.config.payload,
            self.config.timeout,
        )
    }

    /// The encoded echo request this prober sends.
    pub fn request(&self) -> Result<Vec<u8>> {
        Ok(EchoMessage::request(
            self.config.identifier.0,
            self.config.sequence.0,
            self.config.payload.clone(),
        )
        .encode_with_checksum()?)
    }

    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }
}
