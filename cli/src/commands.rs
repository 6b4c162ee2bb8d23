pub mod scan;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lanprobe")]
#[command(about = "Discovers and risk-scores hosts on the local network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep a subnet, deep-scan every live host and report findings
    #[command(alias = "s")]
    Scan {
        /// CIDR range to sweep; unparseable input falls back to the
        /// default home range
        #[arg(default_value = "192.168.1.0/24")]
        range: String,
        /// Skip the vulnerability report
        #[arg(long)]
        no_vulns: bool,
    },
    /// List the well-known ports the deep scan probes
    #[command(alias = "p")]
    Ports,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
