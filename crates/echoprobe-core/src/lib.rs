//! Echoprobe - A single `ICMP` echo probe library.
//!
//! This crate sends one `ICMPv4` echo request to a target and waits, up to a
//! timeout, for the matching echo reply, reporting the round trip time.
//!
//! # Example
//!
//! The following example builds a prober with default configuration and
//! sends a single probe:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::IpAddr;
//! # use std::str::FromStr;
//! use echoprobe_core::{Builder, ProbeResult};
//!
//! let addr = IpAddr::from_str("1.1.1.1")?;
//! match Builder::new(addr).build()?.probe()? {
//!     ProbeResult::Success { round_trip, responder_addr } => {
//!         println!("reply from {responder_addr} in {round_trip:?}");
//!     }
//!     ProbeResult::Timeout => println!("timed out"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Prober`].
//! - [`probe`] - Send a single probe over any [`Network`].
#![deny(unsafe_code)]

mod builder;
mod config;
mod constants;
mod error;
mod net;
mod probe;
mod types;

pub use builder::Builder;
pub use config::{defaults, ProbeConfig};
pub use constants::MAX_PAYLOAD_SIZE;
pub use error::{Error, IoError, IoOperation, IoResult, Result};
pub use net::channel::Channel;
pub use net::socket::Socket;
pub use net::{Network, SocketImpl};
pub use probe::{probe, ProbeResult, Prober};
pub use types::{Sequence, TraceId};
