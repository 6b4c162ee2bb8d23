//! # Vulnerability Analysis
//!
//! A deliberately small, deterministic rule table over discovered services.
//! This is a hygiene check for obviously risky protocols, not a CVE
//! database; the SSH version markers in particular are a minimal
//! placeholder rule set and stay that way.

use std::net::Ipv4Addr;

use lanprobe_common::network::host::{HostRecord, ServiceRecord};
use lanprobe_common::vulns::{Severity, VulnerabilityRecord};

/// Applies the rule table to every open service on every host.
///
/// Findings come back sorted severity-descending; equal severities keep
/// their discovery order (the sort key is stable).
pub fn analyze(hosts: &[HostRecord]) -> Vec<VulnerabilityRecord> {
    let mut findings = Vec::new();
    for host in hosts {
        for service in host.services.values() {
            check_service(host.addr, service, &mut findings);
        }
    }
    findings.sort_by_key(|finding| finding.severity);
    findings
}

fn check_service(addr: Ipv4Addr, service: &ServiceRecord, findings: &mut Vec<VulnerabilityRecord>) {
    match service.name.to_lowercase().as_str() {
        "telnet" => findings.push(finding(
            addr,
            service,
            Severity::High,
            "Telnet service uses unencrypted communication.".to_string(),
            "Disable Telnet and use SSH for secure remote access.",
        )),
        "ftp" => findings.push(finding(
            addr,
            service,
            Severity::Medium,
            "FTP service may transmit credentials in plain text.".to_string(),
            "Use SFTP or FTPS for secure file transfer and disable anonymous access if it is not needed.",
        )),
        "http" | "http-alt" => {
            if service.port == 80 || service.port == 8080 {
                findings.push(finding(
                    addr,
                    service,
                    Severity::Low,
                    "HTTP service transmits data unencrypted.".to_string(),
                    "Serve traffic over HTTPS (SSL/TLS).",
                ));
            } else {
                findings.push(finding(
                    addr,
                    service,
                    Severity::Info,
                    "HTTP service running on a non-standard port.".to_string(),
                    "Confirm this is intended and consider moving to HTTPS.",
                ));
            }
        }
        "ssh" => {
            let banner = service.banner.to_lowercase();
            if banner.contains("openssh_6") || banner.contains("openssh_5") {
                findings.push(finding(
                    addr,
                    service,
                    Severity::Medium,
                    format!("Potentially outdated SSH version ({}).", service.banner),
                    "Update the SSH server, disable weak ciphers and prefer key-based authentication.",
                ));
            } else {
                findings.push(finding(
                    addr,
                    service,
                    Severity::Info,
                    "SSH service detected. Review configuration.".to_string(),
                    "Disable root login, use key-based authentication and keep the server updated.",
                ));
            }
        }
        _ => {}
    }
}

fn finding(
    addr: Ipv4Addr,
    service: &ServiceRecord,
    severity: Severity,
    description: String,
    remediation: &str,
) -> VulnerabilityRecord {
    VulnerabilityRecord {
        addr,
        port: service.port,
        service: service.name.clone(),
        severity,
        description,
        remediation: remediation.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn host_with(services: Vec<ServiceRecord>) -> HostRecord {
        let mut record = HostRecord::reachable(Ipv4Addr::new(192, 168, 1, 10));
        let mut map = BTreeMap::new();
        for service in services {
            record.open_ports.insert(service.port);
            map.insert(service.port, service);
        }
        record.services = map;
        record
    }

    #[test]
    fn outdated_ssh_banner_is_a_medium_finding() {
        let host = host_with(vec![ServiceRecord::new(22, "SSH", "SSH-2.0-OpenSSH_6.6")]);
        let findings = analyze(&[host]);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(findings[0].description.contains("OpenSSH_6.6"));
    }

    #[test]
    fn current_ssh_banner_is_informational() {
        let host = host_with(vec![ServiceRecord::new(22, "SSH", "SSH-2.0-OpenSSH_9.3")]);
        let findings = analyze(&[host]);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn telnet_and_ftp_have_fixed_severities() {
        let host = host_with(vec![
            ServiceRecord::new(21, "FTP", ""),
            ServiceRecord::new(23, "Telnet", ""),
        ]);
        let findings = analyze(&[host]);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].service, "Telnet");
        assert_eq!(findings[1].severity, Severity::Medium);
        assert_eq!(findings[1].service, "FTP");
    }

    #[test]
    fn http_severity_depends_on_the_port() {
        let host = host_with(vec![
            ServiceRecord::new(80, "HTTP", ""),
            ServiceRecord::new(8080, "HTTP-Alt", ""),
            ServiceRecord::new(8081, "HTTP", ""),
        ]);
        let findings = analyze(&[host]);

        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].severity, Severity::Low);
        assert_eq!(findings[0].port, 80);
        assert_eq!(findings[1].severity, Severity::Low);
        assert_eq!(findings[1].port, 8080);
        assert_eq!(findings[2].severity, Severity::Info);
        assert_eq!(findings[2].port, 8081);
    }

    #[test]
    fn unlisted_services_produce_no_findings() {
        let host = host_with(vec![
            ServiceRecord::new(443, "HTTPS", ""),
            ServiceRecord::new(3306, "MySQL", ""),
        ]);
        assert!(analyze(&[host]).is_empty());
    }

    #[test]
    fn findings_sort_by_severity_and_keep_discovery_order_on_ties() {
        let host_a = host_with(vec![
            ServiceRecord::new(21, "FTP", ""),
            ServiceRecord::new(80, "HTTP", ""),
        ]);
        let mut host_b = host_with(vec![
            ServiceRecord::new(23, "Telnet", ""),
            ServiceRecord::new(21, "FTP", ""),
        ]);
        host_b.addr = Ipv4Addr::new(192, 168, 1, 11);

        let findings = analyze(&[host_a.clone(), host_b.clone()]);

        let severities: Vec<Severity> = findings.iter().map(|f| f.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::High,
                Severity::Medium,
                Severity::Medium,
                Severity::Low
            ]
        );
        // Both Medium findings are FTP; host_a was analyzed first.
        assert_eq!(findings[1].addr, host_a.addr);
        assert_eq!(findings[2].addr, host_b.addr);
    }
}
