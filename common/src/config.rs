use std::time::Duration;

use crate::network::ports;

/// Tuning knobs for a scan run.
///
/// Passed by reference into the engine; every worker task gets a cheap
/// clone behind an `Arc`. Defaults are conservative enough for a home
/// /24 while keeping a full sweep under a minute.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Overall budget for the liveness probe of a single candidate.
    pub probe_timeout: Duration,
    /// Ports raced during the liveness probe. A completed handshake or an
    /// active refusal on any of them counts as "host is up".
    pub probe_ports: Vec<u16>,
    /// Per-port connect budget during the deep scan.
    pub connect_timeout: Duration,
    /// Connect budget for the banner grab (fresh connection per port).
    pub banner_connect_timeout: Duration,
    /// Read budget for the banner grab.
    pub banner_read_timeout: Duration,
    /// Budget for the reverse DNS lookup of one host.
    pub dns_timeout: Duration,
    /// How many candidates are probed concurrently per discovery batch.
    pub discovery_batch: usize,
    /// How many ports are connected concurrently per port-scan batch.
    pub port_batch: usize,
    /// The ports attempted during the deep scan.
    ///
    /// Defaults to the well-known service list; overridable so tests can
    /// point the scanner at ephemeral loopback listeners.
    pub ports: Vec<u16>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(500),
            probe_ports: vec![80, 443, 22, 7],
            connect_timeout: Duration::from_millis(1500),
            banner_connect_timeout: Duration::from_millis(1000),
            banner_read_timeout: Duration::from_millis(1000),
            dns_timeout: Duration::from_millis(2000),
            discovery_batch: 25,
            port_batch: 8,
            ports: ports::COMMON_PORTS.to_vec(),
        }
    }
}
