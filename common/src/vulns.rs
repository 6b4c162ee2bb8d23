//! Risk findings produced by the vulnerability analyzer.

use std::net::Ipv4Addr;

/// Five fixed severity levels with a total order.
///
/// `Critical` is declared first so the derived `Ord` ranks it lowest; a
/// stable ascending sort on this key therefore yields the required
/// severity-descending report while preserving discovery order on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{label}")
    }
}

/// One finding against one service on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityRecord {
    pub addr: Ipv4Addr,
    pub port: u16,
    pub service: String,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
}
