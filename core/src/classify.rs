//! # Device Classification
//!
//! Two pure heuristics the engine composes: hostname keywords first, then
//! a port-pattern refinement that only fires when the hostname said
//! nothing. Both are deterministic so they can be tested in isolation.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use lanprobe_common::network::host::DeviceCategory;

/// Ordered keyword groups; the first group with a hit decides the label
/// and category, mirroring how vendors tend to name their gear.
const HOSTNAME_RULES: &[(&[&str], &str, DeviceCategory)] = &[
    (
        &["macbook", "imac", "mac-", "apple"],
        "macOS",
        DeviceCategory::Computer,
    ),
    (&["iphone", "ipad", "ipod"], "iOS", DeviceCategory::Mobile),
    (
        &["win", "pc-", "desktop", "laptop", "workstation"],
        "Windows",
        DeviceCategory::Computer,
    ),
    (
        &["android", "samsung", "pixel", "nexus"],
        "Android",
        DeviceCategory::Mobile,
    ),
    (
        &["router", "gateway", "linksys", "netgear", "asus", "tplink"],
        "Network Device",
        DeviceCategory::Router,
    ),
    (
        &["printer", "canon", "epson", "hp", "brother"],
        "Printer",
        DeviceCategory::Printer,
    ),
    (
        &["iot", "smart", "alexa", "nest", "ring"],
        "IoT Device",
        DeviceCategory::Iot,
    ),
    (
        &["server", "srv", "nas", "database"],
        "Server",
        DeviceCategory::Server,
    ),
    (
        &["ubuntu", "debian", "centos", "fedora", "linux"],
        "Linux",
        DeviceCategory::Computer,
    ),
    (&["computer", "host"], "Computer", DeviceCategory::Computer),
];

/// Stage A: derive (OS label, category) from the resolved hostname, or
/// from the host's position in the subnet when no hostname exists.
pub fn from_hostname(hostname: Option<&str>, addr: Ipv4Addr) -> (&'static str, DeviceCategory) {
    let Some(hostname) = hostname.filter(|name| !name.is_empty()) else {
        return infer_from_addr(addr);
    };

    let lowered = hostname.to_lowercase();
    for (keywords, os_label, category) in HOSTNAME_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return (os_label, *category);
        }
    }
    ("Unknown", DeviceCategory::Unknown)
}

/// Nameless hosts still hint at their role through the last octet:
/// gateways sit at .1, infrastructure right after it, DHCP pools at the
/// top of the range.
fn infer_from_addr(addr: Ipv4Addr) -> (&'static str, DeviceCategory) {
    match addr.octets()[3] {
        1 => ("Gateway/Router", DeviceCategory::Router),
        2..=10 => ("Network Device", DeviceCategory::Router),
        200..=254 => ("DHCP Client", DeviceCategory::Computer),
        _ => ("Unknown", DeviceCategory::Unknown),
    }
}

/// Stage B: refine an `Unknown` category from the open-port pattern.
/// Rules fire in order, first match wins; a known category passes through
/// untouched.
pub fn refine_from_ports(current: DeviceCategory, open_ports: &BTreeSet<u16>) -> DeviceCategory {
    if current != DeviceCategory::Unknown {
        return current;
    }
    let open = |port: u16| open_ports.contains(&port);

    if open(22) && (open(80) || open(443)) {
        return DeviceCategory::Server;
    }
    if open(3389) {
        return DeviceCategory::Computer;
    }
    if open(5900) {
        return DeviceCategory::Computer;
    }
    if open(631) || open(9100) {
        return DeviceCategory::Printer;
    }
    if open(3306) || open(5432) || open(1433) || open(27017) {
        return DeviceCategory::Server;
    }
    if open(80) || open(443) || open(8080) {
        // A bare admin page reads as a router; a wider surface as a server.
        // The <= 3 threshold is a tuning constant, not a protocol fact.
        return if open_ports.len() <= 3 {
            DeviceCategory::Router
        } else {
            DeviceCategory::Server
        };
    }
    if open_ports.is_empty() {
        return DeviceCategory::Computer;
    }
    DeviceCategory::Unknown
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
