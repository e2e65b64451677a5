use crate::types::{Sequence, TraceId};
use std::net::IpAddr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    /// The default value for `target`.
    pub const DEFAULT_TARGET_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

    /// The default value for `identifier`.
    pub const DEFAULT_IDENTIFIER: u16 = 1;

    /// The default value for `sequence`.
    pub const DEFAULT_SEQUENCE: u16 = 1;

    /// The default value for `payload`.
    pub const DEFAULT_PAYLOAD: &[u8] = b"onditpainauchocolat";

    /// The default value for `timeout`.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
}

/// The configuration of a single probe.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProbeConfig {
    pub target_addr: IpAddr,
    pub identifier: TraceId,
    pub sequence: Sequence,
    pub payload: Vec<u8>,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_addr: defaults::DEFAULT_TARGET_ADDR,
            identifier: TraceId(defaults::DEFAULT_IDENTIFIER),
            sequence: Sequence(defaults::DEFAULT_SEQUENCE),
            payload: defaults::DEFAULT_PAYLOAD.to_vec(),
            timeout: defaults::DEFAULT_TIMEOUT,
        }
    }
}
