//! # Range Expansion
//!
//! Turns a CIDR string into the bounded list of candidate addresses a scan
//! will probe. Parsing is strict, but the public entry point never fails:
//! anything unparseable degrades to the default home range so a scan always
//! has something to sweep.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;
use tracing::warn;

use crate::error::ScanError;

/// Hard cap on expansion for wide prefixes (<= /23), to bound scan time
/// and memory on ranges like a /16.
pub const MAX_EXPANDED_HOSTS: usize = 254 * 2;

const MIN_PREFIX: u8 = 16;
const MAX_PREFIX: u8 = 30;

/// Expands `A.B.C.D/N` into every usable address strictly between the
/// network base and the broadcast address, capped at
/// [`MAX_EXPANDED_HOSTS`] when the prefix leaves more than 8 host bits.
///
/// Malformed input, non-IPv4 addresses and prefixes outside 16..=30 all
/// fall back to `192.168.1.1`-`192.168.1.254` instead of failing the scan.
/// The result is free of duplicates: it is produced by a monotone walk
/// over the address integers.
pub fn expand_cidr(range: &str) -> Vec<Ipv4Addr> {
    match try_expand(range) {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!("{err}; falling back to the default range");
            default_range()
        }
    }
}

fn try_expand(range: &str) -> Result<Vec<Ipv4Addr>, ScanError> {
    let invalid = || ScanError::InvalidRange(range.to_string());

    let (addr_str, prefix_str) = range.split_once('/').ok_or_else(invalid)?;
    let addr: Ipv4Addr = addr_str.trim().parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix_str.trim().parse().map_err(|_| invalid())?;

    if !(MIN_PREFIX..=MAX_PREFIX).contains(&prefix) {
        return Err(invalid());
    }

    let network = Ipv4Network::new(addr, prefix).map_err(|_| invalid())?;
    let base: u32 = network.network().into();
    let broadcast: u32 = network.broadcast().into();

    let host_bits = 32 - prefix;
    let cap = if host_bits > 8 { MAX_EXPANDED_HOSTS } else { usize::MAX };

    // Strictly between base and broadcast; the exclusive upper bound drops
    // the broadcast address itself.
    Ok((base + 1..broadcast).take(cap).map(Ipv4Addr::from).collect())
}

fn default_range() -> Vec<Ipv4Addr> {
    (1..=254).map(|i| Ipv4Addr::new(192, 168, 1, i)).collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
