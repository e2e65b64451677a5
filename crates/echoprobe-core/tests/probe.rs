use echoprobe_core::{probe, Builder, Network, ProbeResult, Result, Sequence, TraceId};
use echoprobe_packet::checksum::{ipv4_header_checksum, verify_checksum};
use echoprobe_packet::echo::EchoMessage;
use echoprobe_packet::icmpv4::IcmpType;
use echoprobe_packet::ipv4::Ipv4Packet;
use echoprobe_packet::IpProtocol;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

const TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
const LOCAL: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

/// How the scripted responder answers each echo request.
#[derive(Debug, Clone, Copy)]
enum Script {
    /// Reply with the request's identifier.
    Echo,
    /// Reply with a different identifier first and then with the request's identifier.
    ForeignThenEcho,
    /// Deliver garbage first and then a valid reply.
    GarbageThenEcho,
    /// Never reply.
    Silent,
}

/// A transport which answers echo requests as a remote host would, wrapping
/// each reply in an `IPv4` header as a raw socket does.
struct ScriptedNetwork {
    script: Script,
    delay: Duration,
    queue: VecDeque<(Instant, Vec<u8>)>,
    sent: Vec<Vec<u8>>,
}

impl ScriptedNetwork {
    fn new(script: Script) -> Self {
        Self {
            script,
            delay: Duration::ZERO,
            queue: VecDeque::new(),
            sent: vec![],
        }
    }

    fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

fn wrap_ipv4(src: Ipv4Addr, dest: Ipv4Addr, icmp: &[u8]) -> Vec<u8> {
    let mut buf = vec![0_u8; Ipv4Packet::minimum_packet_size() + icmp.len()];
    let total_length = u16::try_from(buf.len()).unwrap();
    let mut ipv4 = Ipv4Packet::new(&mut buf).unwrap();
    ipv4.set_version(4);
    ipv4.set_header_length(5);
    ipv4.set_total_length(total_length);
    ipv4.set_ttl(64);
    ipv4.set_protocol(IpProtocol::Icmp);
    ipv4.set_source(src);
    ipv4.set_destination(dest);
    ipv4.set_payload(icmp);
    let checksum = ipv4_header_checksum(&ipv4.packet()[..20]);
    ipv4.set_checksum(checksum);
    buf
}

impl Network for ScriptedNetwork {
    fn send_to(&mut self, buf: &[u8], addr: IpAddr) -> Result<()> {
        self.sent.push(buf.to_vec());
        let IpAddr::V4(responder) = addr else {
            return Ok(());
        };
        let request = EchoMessage::decode(buf)?;
        let ready_at = Instant::now() + self.delay;
        let echo = |identifier| {
            let reply = EchoMessage::reply(identifier, request.sequence, request.payload.clone())
                .encode_with_checksum()?;
            Ok::<_, echoprobe_core::Error>((ready_at, wrap_ipv4(responder, LOCAL, &reply)))
        };
        match self.script {
            Script::Echo => self.queue.push_back(echo(request.identifier)?),
            Script::ForeignThenEcho => {
                self.queue
                    .push_back(echo(request.identifier.wrapping_add(1))?);
                self.queue.push_back(echo(request.identifier)?);
            }
            Script::GarbageThenEcho => {
                self.queue.push_back((ready_at, vec![0x45, 0x00, 0x00]));
                self.queue.push_back((ready_at, vec![0x00, 0x00, 0xff]));
                self.queue.push_back(echo(request.identifier)?);
            }
            Script::Silent => {}
        }
        Ok(())
    }

    fn recv_from(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, IpAddr)>> {
        let deadline = Instant::now() + timeout;
        match self.queue.front() {
            Some((ready_at, _)) if *ready_at <= deadline => {
                std::thread::sleep(ready_at.saturating_duration_since(Instant::now()));
                let (_, packet) = self.queue.pop_front().unwrap();
                let src = Ipv4Packet::new_view(&packet).map_or(LOCAL, |ipv4| ipv4.get_source());
                buf[..packet.len()].copy_from_slice(&packet);
                Ok(Some((packet.len(), IpAddr::V4(src))))
            }
            _ => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

#[test]
fn test_echo_reply() -> anyhow::Result<()> {
    let timeout = Duration::from_secs(1);
    let mut network = ScriptedNetwork::new(Script::Echo).with_delay(Duration::from_millis(5));
    let result = probe(
        &mut network,
        TARGET,
        TraceId(1),
        Sequence(1),
        b"onditpainauchocolat",
        timeout,
    )?;
    let ProbeResult::Success {
        round_trip,
        responder_addr,
    } = result
    else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(TARGET, responder_addr);
    assert!(round_trip >= Duration::from_millis(5));
    assert!(round_trip < timeout);
    assert_eq!(1, network.sent.len());
    let request = EchoMessage::decode(&network.sent[0])?;
    assert_eq!(IcmpType::EchoRequest, request.icmp_type);
    assert_eq!(0xbe46, request.checksum);
    assert!(verify_checksum(&network.sent[0]));
    Ok(())
}

#[test]
fn test_foreign_identifier_is_skipped() -> anyhow::Result<()> {
    let mut network = ScriptedNetwork::new(Script::ForeignThenEcho);
    let result = probe(
        &mut network,
        TARGET,
        TraceId(0xffff),
        Sequence(3),
        b"",
        Duration::from_secs(1),
    )?;
    assert!(matches!(result, ProbeResult::Success { .. }));
    assert!(network.queue.is_empty());
    Ok(())
}

#[test]
fn test_garbage_is_skipped() -> anyhow::Result<()> {
    let mut network = ScriptedNetwork::new(Script::GarbageThenEcho);
    let result = probe(
        &mut network,
        TARGET,
        TraceId(77),
        Sequence(1),
        &[0xde, 0xad, 0xbe],
        Duration::from_secs(1),
    )?;
    assert!(matches!(result, ProbeResult::Success { .. }));
    Ok(())
}

#[test]
fn test_silent_target_times_out() -> anyhow::Result<()> {
    let timeout = Duration::from_millis(100);
    let mut network = ScriptedNetwork::new(Script::Silent);
    let start = Instant::now();
    let result = probe(
        &mut network,
        TARGET,
        TraceId(1),
        Sequence(1),
        b"",
        timeout,
    )?;
    let elapsed = start.elapsed();
    assert_eq!(ProbeResult::Timeout, result);
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout * 5);
    Ok(())
}

#[test]
fn test_slow_reply_times_out() -> anyhow::Result<()> {
    let timeout = Duration::from_millis(50);
    let mut network = ScriptedNetwork::new(Script::Echo).with_delay(Duration::from_millis(200));
    let start = Instant::now();
    let result = probe(&mut network, TARGET, TraceId(1), Sequence(1), b"", timeout)?;
    assert_eq!(ProbeResult::Timeout, result);
    assert!(start.elapsed() < Duration::from_millis(200));
    Ok(())
}

#[test]
fn test_prober_from_builder() -> anyhow::Result<()> {
    let mut prober = Builder::new(TARGET)
        .identifier(TraceId(4242))
        .sequence(Sequence(12))
        .payload(b"ping".to_vec())
        .timeout(Duration::from_millis(500))
        .build_with(ScriptedNetwork::new(Script::Echo))?;
    assert!(matches!(prober.probe()?, ProbeResult::Success { .. }));
    let request = EchoMessage::decode(&prober.request()?)?;
    assert_eq!(4242, request.identifier);
    assert_eq!(12, request.sequence);
    assert_eq!(b"ping".to_vec(), request.payload);
    Ok(())
}
