//! # Reachability Probing
//!
//! Unprivileged liveness check: race one TCP handshake per probe port and
//! call the host alive on the first definite signal. A completed connect
//! proves a listener; an active refusal (RST) proves a network stack. Only
//! silence within the budget means "down". Raw ICMP would be the classic
//! answer but needs root, which the engine must not assume.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use lanprobe_common::config::ScanConfig;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;

/// Returns whether `addr` answered at the network layer within
/// `cfg.probe_timeout`. Never fails; every error path reads as
/// "unreachable". Sockets are owned values and close on all paths.
pub async fn is_reachable(addr: Ipv4Addr, cfg: &ScanConfig) -> bool {
    let mut attempts = JoinSet::new();

    for &port in &cfg.probe_ports {
        let target = SocketAddr::from((addr, port));
        let budget = cfg.probe_timeout;
        attempts.spawn(async move {
            match timeout(budget, TcpStream::connect(target)).await {
                Ok(Ok(_stream)) => true,
                Ok(Err(err)) => err.kind() == io::ErrorKind::ConnectionRefused,
                Err(_elapsed) => false,
            }
        });
    }

    while let Some(outcome) = attempts.join_next().await {
        if matches!(outcome, Ok(true)) {
            attempts.abort_all();
            return true;
        }
    }
    false
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
