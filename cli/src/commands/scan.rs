use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::ports::{COMMON_PORTS, service_name};
use lanprobe_core::engine::{ScanEngine, ScanState};
use lanprobe_core::events::ScanEvent;

use crate::terminal::print;

pub async fn run(range: String, no_vulns: bool) -> anyhow::Result<()> {
    print::header("network scan");

    let engine = Arc::new(ScanEngine::new(ScanConfig::default()));

    // Ctrl-C turns into a cooperative cancel; partial results still print.
    let canceller = Arc::clone(&engine);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}").unwrap());
    bar.enable_steady_tick(Duration::from_millis(100));

    let feed = bar.clone();
    let sink = move |event: ScanEvent| match event {
        ScanEvent::Progress(progress) => {
            feed.set_length(progress.total as u64);
            feed.set_position(progress.completed as u64);
            feed.set_message(progress.operation);
        }
        // Minimal records carry no OS label yet; announce the liveness hit
        // and stay quiet for the detailed follow-up record.
        ScanEvent::HostDiscovered(host) if host.os_label.is_empty() => {
            feed.println(format!("host {} is up", host.addr));
        }
        ScanEvent::HostDiscovered(_) => {}
    };

    let started = Instant::now();
    let hosts = engine.scan(&range, &sink).await?;
    bar.finish_and_clear();

    if engine.state() == ScanState::Cancelled {
        warn!("scan stopped early; showing partial results");
    }

    if hosts.is_empty() {
        print::no_results();
        return Ok(());
    }

    print::header("scan results");
    for (idx, host) in hosts.iter().enumerate() {
        print::host_tree(idx, host);
        if idx + 1 != hosts.len() {
            println!();
        }
    }
    print::summary(hosts.len(), started.elapsed());

    if !no_vulns {
        print::header("vulnerability report");
        let findings = engine.analyze_vulnerabilities(&hosts);
        print::findings_report(&findings);
    }

    Ok(())
}

pub fn list_ports() {
    print::header("well-known ports");
    for &port in COMMON_PORTS.iter() {
        print::aligned_line(&port.to_string(), service_name(port));
    }
}
