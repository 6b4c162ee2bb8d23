//! End-to-end engine runs against loopback listeners.
//!
//! The probe and port lists are injected through `ScanConfig`, so every
//! "host" here is 127.0.0.1 with ephemeral-port listeners standing in for
//! real services.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::host::ServiceRecord;
use lanprobe_common::vulns::Severity;
use lanprobe_core::engine::{ScanEngine, ScanState};
use lanprobe_core::events::{EventSink, ScanEvent};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// Synchronous accumulating sink, so tests can assert on exact sequences.
#[derive(Default)]
struct Recorder(Mutex<Vec<ScanEvent>>);

impl EventSink for Recorder {
    fn emit(&self, event: ScanEvent) {
        self.0.lock().unwrap().push(event);
    }
}

impl Recorder {
    fn events(&self) -> Vec<ScanEvent> {
        self.0.lock().unwrap().clone()
    }
}

fn fast_config(probe_port: u16, scan_ports: Vec<u16>) -> ScanConfig {
    ScanConfig {
        probe_ports: vec![probe_port],
        ports: scan_ports,
        probe_timeout: Duration::from_millis(500),
        connect_timeout: Duration::from_millis(500),
        banner_connect_timeout: Duration::from_millis(500),
        banner_read_timeout: Duration::from_millis(500),
        dns_timeout: Duration::from_millis(200),
        ..ScanConfig::default()
    }
}

/// Accept loop that greets every connection with an SSH-style banner.
async fn spawn_banner_listener(banner: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let _ = stream.write_all(banner.as_bytes()).await;
        }
    });
    port
}

async fn spawn_probe_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            if listener.accept().await.is_err() {
                break;
            }
        }
    });
    port
}

#[tokio::test]
async fn full_scan_of_a_single_live_host() {
    let probe_port = spawn_probe_listener().await;
    let ssh_port = spawn_banner_listener("SSH-2.0-OpenSSH_6.6\r\n").await;

    let engine = ScanEngine::new(fast_config(probe_port, vec![ssh_port]));
    let recorder = Recorder::default();

    let hosts = engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST], &recorder)
        .await
        .unwrap();

    assert_eq!(engine.state(), ScanState::Complete);
    assert_eq!(hosts.len(), 1);

    let host = &hosts[0];
    assert_eq!(host.addr, Ipv4Addr::LOCALHOST);
    assert!(host.reachable);
    assert_eq!(
        host.open_ports.iter().copied().collect::<Vec<_>>(),
        vec![ssh_port]
    );
    let service = host.services.get(&ssh_port).expect("service record");
    assert_eq!(service.banner, "SSH-2.0-OpenSSH_6.6");
    assert!(!host.os_label.is_empty());

    // The engine's map holds the detailed record under the same key.
    let snapshot = engine.discovered_hosts();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[&host.addr].open_ports, host.open_ports);
}

#[tokio::test]
async fn event_stream_follows_the_documented_order() {
    let probe_port = spawn_probe_listener().await;

    let engine = ScanEngine::new(fast_config(probe_port, Vec::new()));
    let recorder = Recorder::default();

    engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST], &recorder)
        .await
        .unwrap();

    let events = recorder.events();

    // Opens with the starting snapshot.
    match &events[0] {
        ScanEvent::Progress(progress) => {
            assert_eq!(progress.operation, "Starting network scan...");
            assert_eq!(progress.completed, 0);
            assert_eq!(progress.total, 0);
            assert!(!progress.is_complete);
        }
        other => panic!("expected a progress event first, got {other:?}"),
    }

    // A minimal discovery record precedes the detailed one.
    let discoveries: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ScanEvent::HostDiscovered(host) => Some(host.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(discoveries.len(), 2);
    assert!(discoveries[0].os_label.is_empty());
    assert!(!discoveries[1].os_label.is_empty());

    // Completed counters never decrease within a phase (the counter is
    // relative to the phase's own total).
    for operation in ["Discovering hosts...", "Scanning ports..."] {
        let counters: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                ScanEvent::Progress(progress) if progress.operation == operation => {
                    Some(progress.completed)
                }
                _ => None,
            })
            .collect();
        let mut sorted = counters.clone();
        sorted.sort_unstable();
        assert_eq!(counters, sorted, "counters for {operation}");
    }

    // Ends with the completion snapshot.
    match events.last().unwrap() {
        ScanEvent::Progress(progress) => {
            assert!(progress.is_complete);
            assert_eq!(progress.operation, "Scan completed");
            assert_eq!(progress.completed, 1);
            assert_eq!(progress.total, 1);
        }
        other => panic!("expected a progress event last, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_candidates_are_recorded_once() {
    let probe_port = spawn_probe_listener().await;

    let engine = ScanEngine::new(fast_config(probe_port, Vec::new()));
    let recorder = Recorder::default();

    let hosts = engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST], &recorder)
        .await
        .unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(engine.discovered_hosts().len(), 1);

    let minimal_discoveries = recorder
        .events()
        .iter()
        .filter(|event| {
            matches!(event, ScanEvent::HostDiscovered(host) if host.os_label.is_empty())
        })
        .count();
    assert_eq!(minimal_discoveries, 1);
}

#[tokio::test]
async fn cancelling_mid_scan_returns_only_finished_hosts() {
    let probe_port = spawn_probe_listener().await;

    let engine = Arc::new(ScanEngine::new(fast_config(probe_port, Vec::new())));

    // Cancel as soon as the first host turns up: discovery finishes its
    // batch, the deep scan never starts.
    let canceller = Arc::clone(&engine);
    let events: Arc<Mutex<Vec<ScanEvent>>> = Arc::default();
    let log = Arc::clone(&events);
    let sink = move |event: ScanEvent| {
        if matches!(event, ScanEvent::HostDiscovered(_)) {
            canceller.cancel();
        }
        log.lock().unwrap().push(event);
    };

    let hosts = engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST], &sink)
        .await
        .unwrap();

    assert!(hosts.is_empty());
    assert_eq!(engine.state(), ScanState::Cancelled);

    let events = events.lock().unwrap();
    match events.last().unwrap() {
        ScanEvent::Progress(progress) => {
            assert!(progress.is_complete);
            assert_eq!(progress.operation, "Scan stopped");
        }
        other => panic!("expected a progress event last, got {other:?}"),
    }
    // No detailed record was ever emitted.
    assert!(!events.iter().any(|event| {
        matches!(event, ScanEvent::HostDiscovered(host) if !host.os_label.is_empty())
    }));
}

#[tokio::test]
async fn cancelling_mid_deep_scan_keeps_the_finished_records() {
    let probe_port = spawn_probe_listener().await;

    let engine = Arc::new(ScanEngine::new(fast_config(probe_port, Vec::new())));

    // Two loopback hosts survive discovery (127.0.0.2 answers with a
    // refusal, which counts as alive). Cancel on the first detailed
    // record, between the deep scans.
    let canceller = Arc::clone(&engine);
    let sink = move |event: ScanEvent| {
        if matches!(&event, ScanEvent::HostDiscovered(host) if !host.os_label.is_empty()) {
            canceller.cancel();
        }
    };

    let hosts = engine
        .scan_candidates(
            vec![Ipv4Addr::LOCALHOST, Ipv4Addr::new(127, 0, 0, 2)],
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(engine.state(), ScanState::Cancelled);
    // Exactly the host whose deep scan already finished comes back, as a
    // complete record.
    assert_eq!(hosts.len(), 1);
    assert!(!hosts[0].os_label.is_empty());
}

#[tokio::test]
async fn captured_banner_drives_the_outdated_ssh_finding() {
    let probe_port = spawn_probe_listener().await;
    let ssh_port = spawn_banner_listener("SSH-2.0-OpenSSH_6.6\r\n").await;

    let engine = ScanEngine::new(fast_config(probe_port, vec![ssh_port]));
    let mut hosts = engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST], &lanprobe_core::events::NullSink)
        .await
        .unwrap();

    // The loopback listener sits on an ephemeral port, so relabel the
    // captured service the way port 22 would be labelled in the field.
    let host = &mut hosts[0];
    let captured = host.services.get(&ssh_port).expect("service record");
    let relabelled = ServiceRecord::new(22, "SSH", captured.banner.clone());
    host.open_ports.insert(22);
    host.services.insert(22, relabelled);
    host.open_ports.remove(&ssh_port);
    host.services.remove(&ssh_port);

    let findings = engine.analyze_vulnerabilities(&hosts);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Medium);
    assert_eq!(findings[0].port, 22);
    assert!(findings[0].description.contains("OpenSSH_6.6"));
}

#[tokio::test]
async fn clear_results_empties_the_engine_map() {
    let probe_port = spawn_probe_listener().await;

    let engine = ScanEngine::new(fast_config(probe_port, Vec::new()));
    engine
        .scan_candidates(vec![Ipv4Addr::LOCALHOST], &lanprobe_core::events::NullSink)
        .await
        .unwrap();

    assert!(!engine.discovered_hosts().is_empty());
    engine.clear_results();
    assert!(engine.discovered_hosts().is_empty());
}
