//! Reverse DNS through the system resolver.
//!
//! `getnameinfo` is blocking, so the lookup runs on the blocking pool with
//! a timeout in front. A lookup that outlives the budget is abandoned, not
//! awaited; the stray blocking task finishes on its own.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tokio::task;
use tokio::time::timeout;

/// Resolves `addr` to a hostname, or `None` when there is no PTR record,
/// the resolver fails, or the budget runs out.
///
/// The libc resolver echoes the address string back when no name exists;
/// that echo is treated as "no hostname".
pub async fn reverse_lookup(addr: Ipv4Addr, budget: Duration) -> Option<String> {
    let ip = IpAddr::V4(addr);
    let lookup = task::spawn_blocking(move || dns_lookup::lookup_addr(&ip).ok());

    match timeout(budget, lookup).await {
        Ok(Ok(Some(name))) if !name.is_empty() && name != addr.to_string() => Some(name),
        _ => None,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
