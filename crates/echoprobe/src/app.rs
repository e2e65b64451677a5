use crate::config::{EchoprobeConfig, LogFormat, LogSpanEvents};
use anyhow::Context;
use echoprobe_core::{Builder, ProbeResult, Sequence, TraceId};
use echoprobe_packet::fmt_payload;
use std::net::IpAddr;
use tracing_subscriber::fmt::format::FmtSpan;

/// Run the echoprobe application.
pub fn run_echoprobe(cfg: &EchoprobeConfig) -> anyhow::Result<ProbeResult> {
    configure_logging(cfg);
    tracing::debug!(?cfg);
    let builder = Builder::new(cfg.target_addr)
        .identifier(TraceId(cfg.identifier))
        .sequence(Sequence(cfg.sequence))
        .payload(cfg.payload.clone())
        .timeout(cfg.timeout);
    let mut prober = match builder.build() {
        Ok(prober) => prober,
        Err(err) if err.is_permission_denied() => {
            return Err(err).context(
                "raw ICMP sockets require root privileges or the CAP_NET_RAW capability",
            );
        }
        Err(err) => return Err(err.into()),
    };
    println!("{}", format_request(cfg.target_addr, &prober.request()?));
    let result = prober.probe()?;
    println!("{}", format_result(&result));
    Ok(result)
}

/// The process exit status for a probe result.
pub const fn exit_status(result: &ProbeResult) -> u8 {
    match result {
        ProbeResult::Success { .. } => 0,
        ProbeResult::Timeout => 1,
    }
}

fn format_request(target_addr: IpAddr, request: &[u8]) -> String {
    format!(
        "Sending {} bytes to {target_addr}: {}",
        request.len(),
        fmt_payload(request)
    )
}

fn format_result(result: &ProbeResult) -> String {
    match result {
        ProbeResult::Success { responder_addr, .. } => format!(
            "Received packet from {responder_addr} in {:.2} ms",
            result.round_trip_millis().unwrap_or_default()
        ),
        ProbeResult::Timeout => String::from("Request timed out."),
    }
}

/// Install a `tracing` subscriber if verbose logging was requested.
fn configure_logging(cfg: &EchoprobeConfig) {
    if cfg.verbose {
        let fmt_span = match cfg.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match cfg.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .with_writer(std::io::stderr)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .with_writer(std::io::stderr)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .with_writer(std::io::stderr)
                    .json()
                    .init();
            }
        }
    }
}
