use crate::config::ProbeConfig;
use crate::constants::MAX_PAYLOAD_SIZE;
use crate::error::{Error, Result};
use crate::net::channel::Channel;
use crate::net::{Network, SocketImpl};
use crate::probe::Prober;
use crate::types::{Sequence, TraceId};
use std::net::IpAddr;
use std::time::Duration;

/// Build a prober.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use echoprobe_core::{Builder, Sequence, TraceId};
/// use std::time::Duration;
///
/// let addr = std::net::IpAddr::from([1, 2, 3, 4]);
/// let result = Builder::new(addr)
///     .identifier(TraceId(4321))
///     .sequence(Sequence(7))
///     .payload(b"hello".to_vec())
///     .timeout(Duration::from_millis(500))
///     .build()?
///     .probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder {
    target_addr: IpAddr,
    identifier: TraceId,
    sequence: Sequence,
    payload: Vec<u8>,
    timeout: Duration,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            target_addr: ProbeConfig::default().target_addr,
            identifier: ProbeConfig::default().identifier,
            sequence: ProbeConfig::default().sequence,
            payload: ProbeConfig::default().payload,
            timeout: ProbeConfig::default().timeout,
        }
    }
}

impl Builder {
    /// Build a prober builder for a given target.
    #[must_use]
    pub fn new(target_addr: IpAddr) -> Self {
        Self {
            target_addr,
            ..Default::default()
        }
    }

    /// Set the echo identifier.
    ///
    /// Replies are matched to the request by identifier alone, and so
    /// concurrent probes must each use a distinct identifier.
    ///
    /// If not set then 1 will be used as the identifier.
    #[must_use]
    pub fn identifier(self, identifier: TraceId) -> Self {
        Self { identifier, ..self }
    }

    /// Set the echo sequence number.
    #[must_use]
    pub fn sequence(self, sequence: Sequence) -> Self {
        Self { sequence, ..self }
    }

    /// Set the echo payload.
    #[must_use]
    pub fn payload<P: Into<Vec<u8>>>(self, payload: P) -> Self {
        Self {
            payload: payload.into(),
            ..self
        }
    }

    /// Set the maximum time to wait for a matching reply.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Validate the builder and produce a [`ProbeConfig`].
    pub fn config(self) -> Result<ProbeConfig> {
        if let IpAddr::V6(addr) = self.target_addr {
            return Err(Error::BadConfig(format!(
                "IPv6 target {addr} is not supported"
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::BadConfig(String::from(
                "timeout must be greater than zero",
            )));
        }
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidPacketSize(self.payload.len()));
        }
        Ok(ProbeConfig {
            target_addr: self.target_addr,
            identifier: self.identifier,
            sequence: self.sequence,
            payload: self.payload,
            timeout: self.timeout,
        })
    }

    /// Build a [`Prober`] which sends over a raw `ICMP` socket.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    pub fn build(self) -> Result<Prober<Channel<SocketImpl>>> {
        let config = self.config()?;
        let channel = Channel::connect(config.target_addr)?;
        Ok(Prober::new(channel, config))
    }

    /// Build a [`Prober`] which sends over the given network.
    pub fn build_with<N: Network>(self, network: N) -> Result<Prober<N>> {
        Ok(Prober::new(network, self.config()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use test_case::test_case;

    const TARGET_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(2, 2, 2, 2));

    #[test]
    fn test_builder_minimal() -> anyhow::Result<()> {
        let config = Builder::new(TARGET_ADDR).config()?;
        assert_eq!(TARGET_ADDR, config.target_addr);
        assert_eq!(TraceId(defaults::DEFAULT_IDENTIFIER), config.identifier);
        assert_eq!(Sequence(defaults::DEFAULT_SEQUENCE), config.sequence);
        assert_eq!(defaults::DEFAULT_PAYLOAD, config.payload);
        assert_eq!(defaults::DEFAULT_TIMEOUT, config.timeout);
        Ok(())
    }

    #[test]
    fn test_builder_full() -> anyhow::Result<()> {
        let config = Builder::new(TARGET_ADDR)
            .identifier(TraceId(4321))
            .sequence(Sequence(9))
            .payload("abc")
            .timeout(Duration::from_millis(250))
            .config()?;
        assert_eq!(
            ProbeConfig {
                target_addr: TARGET_ADDR,
                identifier: TraceId(4321),
                sequence: Sequence(9),
                payload: b"abc".to_vec(),
                timeout: Duration::from_millis(250),
            },
            config
        );
        Ok(())
    }

    #[test]
    fn test_builder_empty_payload() -> anyhow::Result<()> {
        let config = Builder::new(TARGET_ADDR).payload(vec![]).config()?;
        assert!(config.payload.is_empty());
        Ok(())
    }

    #[test]
    fn test_builder_largest_payload() -> anyhow::Result<()> {
        let config = Builder::new(TARGET_ADDR)
            .payload(vec![0; MAX_PAYLOAD_SIZE])
            .config()?;
        assert_eq!(MAX_PAYLOAD_SIZE, config.payload.len());
        Ok(())
    }

    #[test]
    fn test_builder_payload_too_large() {
        let err = Builder::new(TARGET_ADDR)
            .payload(vec![0; MAX_PAYLOAD_SIZE + 1])
            .config()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPacketSize(size) if size == MAX_PAYLOAD_SIZE + 1));
    }

    #[test_case(Builder::new(IpAddr::V6(Ipv6Addr::LOCALHOST)), "invalid config: IPv6 target ::1 is not supported"; "ipv6 target")]
    #[test_case(Builder::new(TARGET_ADDR).timeout(Duration::ZERO), "invalid config: timeout must be greater than zero"; "zero timeout")]
    fn test_builder_bad_config(builder: Builder, expected: &str) {
        let err = builder.config().unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
        assert_eq!(expected, err.to_string());
    }

    #[test]
    fn test_build_with() -> anyhow::Result<()> {
        let network = crate::net::MockNetwork::new();
        let prober = Builder::new(TARGET_ADDR)
            .identifier(TraceId(7))
            .build_with(network)?;
        assert_eq!(TraceId(7), prober.config().identifier);
        Ok(())
    }
}
