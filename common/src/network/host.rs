//! # Host Model
//!
//! Records describing a discovered host and the services it exposes.
//!
//! A host first appears in minimal form (address + reachability) the moment
//! the liveness probe answers, and is replaced wholesale by a detailed
//! record once the deep scan finishes. The address is the identity key and
//! never changes after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::time::SystemTime;

/// Best-guess device category derived from weak signals (hostname keywords,
/// IP position, open-port patterns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCategory {
    Router,
    Computer,
    Mobile,
    Printer,
    Iot,
    Server,
    Unknown,
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceCategory::Router => "Router",
            DeviceCategory::Computer => "Computer",
            DeviceCategory::Mobile => "Mobile",
            DeviceCategory::Printer => "Printer",
            DeviceCategory::Iot => "IoT",
            DeviceCategory::Server => "Server",
            DeviceCategory::Unknown => "Unknown",
        };
        write!(f, "{label}")
    }
}

/// One open service on a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub port: u16,
    pub protocol: &'static str,
    pub name: String,
    pub version: Option<String>,
    /// Greeting text captured right after connecting; empty when the
    /// service said nothing or the read failed.
    pub banner: String,
}

impl ServiceRecord {
    pub fn new(port: u16, name: impl Into<String>, banner: impl Into<String>) -> Self {
        Self {
            port,
            protocol: "tcp",
            name: name.into(),
            version: None,
            banner: banner.into(),
        }
    }
}

/// Everything known about a single host on the scanned network.
///
/// `open_ports` is a `BTreeSet`, so the sorted-ascending / no-duplicates
/// invariant holds by construction.
#[derive(Debug, Clone)]
pub struct HostRecord {
    pub addr: Ipv4Addr,
    pub hostname: Option<String>,
    pub os_label: String,
    pub reachable: bool,
    pub open_ports: BTreeSet<u16>,
    pub services: BTreeMap<u16, ServiceRecord>,
    pub rtt_ms: u64,
    pub hardware_addr: Option<String>,
    pub vendor: Option<String>,
    /// WiFi signal strength in dBm; -1 when unknown.
    pub signal_dbm: i32,
    pub category: DeviceCategory,
    pub last_seen: SystemTime,
    pub vulnerability_count: usize,
}

impl HostRecord {
    /// Minimal record created at first successful liveness probe.
    pub fn reachable(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            hostname: None,
            os_label: String::new(),
            reachable: true,
            open_ports: BTreeSet::new(),
            services: BTreeMap::new(),
            rtt_ms: 0,
            hardware_addr: None,
            vendor: None,
            signal_dbm: -1,
            category: DeviceCategory::Unknown,
            last_seen: SystemTime::now(),
            vulnerability_count: 0,
        }
    }
}
