use colored::*;
use lanprobe_common::network::host::HostRecord;
use lanprobe_common::vulns::{Severity, VulnerabilityRecord};
use std::time::Duration;

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black()
    );

    println!("{line}");
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().cyan());
    println!("{} {}", idx_str.bright_black(), name.bright_white().bold());
}

pub fn as_tree_one_level(details: Vec<(String, ColoredString)>) {
    for (i, (key, value)) in details.iter().enumerate() {
        let last: bool = i + 1 == details.len();
        let branch: ColoredString = if last {
            "└─".bright_black()
        } else {
            "├─".bright_black()
        };
        let dots: String = ".".repeat(9usize.saturating_sub(key.chars().count()));
        println!(
            " {} {}{}{} {}",
            branch,
            key.white(),
            dots.bright_black(),
            ":".bright_black(),
            value
        );
    }
}

pub fn host_tree(idx: usize, host: &HostRecord) {
    tree_head(idx, host.hostname.as_deref().unwrap_or("No hostname"));

    let ports: String = if host.open_ports.is_empty() {
        "none open".to_string()
    } else {
        host.services
            .values()
            .map(|service| format!("{} ({})", service.port, service.name))
            .collect::<Vec<String>>()
            .join(", ")
    };

    let details: Vec<(String, ColoredString)> = vec![
        ("IP".to_string(), host.addr.to_string().cyan()),
        ("OS".to_string(), host.os_label.clone().normal()),
        ("Type".to_string(), host.category.to_string().normal()),
        ("RTT".to_string(), format!("{} ms", host.rtt_ms).yellow()),
        ("Ports".to_string(), ports.normal()),
    ];
    as_tree_one_level(details);
}

pub fn summary(hosts_len: usize, total_time: Duration) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    println!();
    println!("Scan complete: {active_hosts} identified in {elapsed}");
}

pub fn findings_report(findings: &[VulnerabilityRecord]) {
    if findings.is_empty() {
        println!("{}", "No findings for the discovered services.".green());
        return;
    }

    for finding in findings {
        let tag: ColoredString = severity_tag(finding.severity);
        println!(
            "{} {}:{} {} {}",
            tag,
            finding.addr.to_string().cyan(),
            finding.port.to_string().cyan(),
            finding.service.bright_white(),
            finding.description
        );
        println!(
            " {} {}",
            "└─".bright_black(),
            finding.remediation.dimmed()
        );
    }
}

fn severity_tag(severity: Severity) -> ColoredString {
    let label: String = format!("[{severity}]");
    match severity {
        Severity::Critical | Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.blue(),
        Severity::Info => label.dimmed(),
    }
}

pub fn aligned_line(key: &str, value: &str) {
    let dots: String = ".".repeat(16usize.saturating_sub(key.chars().count()));
    println!(
        "{} {}{}{} {}",
        ">".bright_black(),
        key.cyan(),
        dots.bright_black(),
        ":".bright_black(),
        value
    );
}

pub fn no_results() {
    println!("{}", "No active hosts detected.".red().bold());
}
