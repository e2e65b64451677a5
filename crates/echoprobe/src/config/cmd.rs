use crate::config::{LogFormat, LogSpanEvents};
use clap::builder::Styles;
use clap::Parser;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Send a single ICMP echo request and report the round trip time
#[derive(Parser, Debug)]
#[command(name = "echoprobe", author, version, about, long_about = None, styles=Styles::styled())]
pub struct Args {
    /// The IPv4 address to probe [default: 1.1.1.1]
    #[arg(value_parser = parse_addr)]
    pub target: Option<IpAddr>,

    /// Config file
    #[arg(short = 'c', long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<String>,

    /// The echo identifier [default: 1]
    #[arg(short = 'i', long)]
    pub identifier: Option<u16>,

    /// The echo sequence number [default: 1]
    #[arg(short = 's', long)]
    pub sequence: Option<u16>,

    /// The echo payload [default: onditpainauchocolat]
    #[arg(short = 'p', long)]
    pub payload: Option<String>,

    /// The maximum time to wait for a matching reply [default: 1s]
    #[arg(short = 't', long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// The debug log format [default: pretty]
    #[arg(value_enum, long)]
    pub log_format: Option<LogFormat>,

    /// The debug log filter [default: echoprobe=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// The debug log format [default: off]
    #[arg(value_enum, long)]
    pub log_span_events: Option<LogSpanEvents>,

    /// Enable verbose debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    Ok(humantime::parse_duration(value)?)
}

fn parse_addr(value: &str) -> anyhow::Result<IpAddr> {
    Ok(IpAddr::from_str(value)?)
}
