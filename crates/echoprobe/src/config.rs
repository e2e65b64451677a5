use anyhow::anyhow;
use clap::ValueEnum;
use echoprobe_core::{defaults, MAX_PAYLOAD_SIZE};
use file::ConfigFile;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

mod cmd;
mod constants;
mod file;

pub use cmd::Args;

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// Fully parsed and validated configuration.
#[derive(Debug, Eq, PartialEq)]
pub struct EchoprobeConfig {
    pub target_addr: IpAddr,
    pub identifier: u16,
    pub sequence: u16,
    pub payload: Vec<u8>,
    pub timeout: Duration,
    pub verbose: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub log_span_events: LogSpanEvents,
}

impl EchoprobeConfig {
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let cfg_file = if let Some(cfg) = &args.config_file {
            file::read_config_file(cfg)?
        } else {
            file::read_default_config_file()?.unwrap_or_default()
        };
        Self::build_config(args, cfg_file)
    }

    fn build_config(args: Args, cfg_file: ConfigFile) -> anyhow::Result<Self> {
        let cfg_file_echoprobe = cfg_file.echoprobe.unwrap_or_default();
        let cfg_file_probe = cfg_file.probe.unwrap_or_default();
        let target_addr = cfg_layer(
            args.target,
            cfg_file_probe.target,
            defaults::DEFAULT_TARGET_ADDR,
        );
        let identifier = cfg_layer(
            args.identifier,
            cfg_file_probe.identifier,
            defaults::DEFAULT_IDENTIFIER,
        );
        let sequence = cfg_layer(
            args.sequence,
            cfg_file_probe.sequence,
            defaults::DEFAULT_SEQUENCE,
        );
        let payload = cfg_layer(
            args.payload.map(String::into_bytes),
            cfg_file_probe.payload.map(String::into_bytes),
            defaults::DEFAULT_PAYLOAD.to_vec(),
        );
        let timeout = cfg_layer(
            args.timeout,
            cfg_file_probe.timeout,
            defaults::DEFAULT_TIMEOUT,
        );
        let log_format = cfg_layer(
            args.log_format,
            cfg_file_echoprobe.log_format,
            constants::DEFAULT_LOG_FORMAT,
        );
        let log_filter = cfg_layer(
            args.log_filter,
            cfg_file_echoprobe.log_filter,
            String::from(constants::DEFAULT_LOG_FILTER),
        );
        let log_span_events = cfg_layer(
            args.log_span_events,
            cfg_file_echoprobe.log_span_events,
            constants::DEFAULT_LOG_SPAN_EVENTS,
        );
        validate_target(target_addr)?;
        validate_timeout(timeout)?;
        validate_payload(&payload)?;
        Ok(Self {
            target_addr,
            identifier,
            sequence,
            payload,
            timeout,
            verbose: args.verbose,
            log_format,
            log_filter,
            log_span_events,
        })
    }
}

impl Default for EchoprobeConfig {
    fn default() -> Self {
        Self {
            target_addr: defaults::DEFAULT_TARGET_ADDR,
            identifier: defaults::DEFAULT_IDENTIFIER,
            sequence: defaults::DEFAULT_SEQUENCE,
            payload: defaults::DEFAULT_PAYLOAD.to_vec(),
            timeout: defaults::DEFAULT_TIMEOUT,
            verbose: false,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
            log_span_events: constants::DEFAULT_LOG_SPAN_EVENTS,
        }
    }
}

fn cfg_layer<T>(fst: Option<T>, snd: Option<T>, def: T) -> T {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => val,
        (None, None) => def,
    }
}

/// Validate the target address.
fn validate_target(target_addr: IpAddr) -> anyhow::Result<()> {
    match target_addr {
        IpAddr::V4(_) => Ok(()),
        IpAddr::V6(_) => Err(anyhow!(
            "target address {target_addr} is not supported, only IPv4 targets may be probed"
        )),
    }
}

/// Validate the timeout.
fn validate_timeout(timeout: Duration) -> anyhow::Result<()> {
    if timeout.is_zero() {
        Err(anyhow!("timeout ({timeout:?}) must be greater than zero"))
    } else {
        Ok(())
    }
}

/// Validate the payload size.
fn validate_payload(payload: &[u8]) -> anyhow::Result<()> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        Err(anyhow!(
            "payload size ({}) must not be greater than {MAX_PAYLOAD_SIZE}",
            payload.len()
        ))
    } else {
        Ok(())
    }
}
