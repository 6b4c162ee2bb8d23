//! # Port Scanning
//!
//! TCP connect scan over the configured port list, in small concurrent
//! batches so a single host never sees the whole list at once. A refused,
//! filtered or timed-out connect all read the same way: closed.

use std::collections::{BTreeMap, BTreeSet};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use lanprobe_common::config::ScanConfig;
use lanprobe_common::network::host::ServiceRecord;
use lanprobe_common::network::ports;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::debug;

use crate::banner;

/// Scans `cfg.ports` against one reachable host.
///
/// Returns the open ports (sorted and deduplicated by the set type) and a
/// service record per open port, banner included. Individual port failures
/// never surface.
pub async fn scan_ports(
    addr: Ipv4Addr,
    cfg: &ScanConfig,
) -> (BTreeSet<u16>, BTreeMap<u16, ServiceRecord>) {
    let mut open_ports = BTreeSet::new();
    let mut services = BTreeMap::new();

    for batch in cfg.ports.chunks(cfg.port_batch.max(1)) {
        let mut attempts = JoinSet::new();

        for &port in batch {
            let connect_budget = cfg.connect_timeout;
            let banner_connect = cfg.banner_connect_timeout;
            let banner_read = cfg.banner_read_timeout;
            attempts.spawn(async move {
                if !is_port_open(addr, port, connect_budget).await {
                    return None;
                }
                let banner = banner::grab_banner(addr, port, banner_connect, banner_read).await;
                Some(ServiceRecord::new(port, ports::service_name(port), banner))
            });
        }

        while let Some(outcome) = attempts.join_next().await {
            match outcome {
                Ok(Some(service)) => {
                    open_ports.insert(service.port);
                    services.insert(service.port, service);
                }
                Ok(None) => {}
                // A lost worker costs at most one port's result; the scan
                // of the remaining ports continues.
                Err(err) => debug!("port worker for {addr} lost: {err}"),
            }
        }
    }

    (open_ports, services)
}

async fn is_port_open(addr: Ipv4Addr, port: u16, budget: Duration) -> bool {
    let target = SocketAddr::from((addr, port));
    matches!(timeout(budget, TcpStream::connect(target)).await, Ok(Ok(_)))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
