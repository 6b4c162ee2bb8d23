//! # Scan Engine
//!
//! Sequences the scan phases and owns all cross-cutting state: the phase
//! machine, the cancellation flag, and the map of discovered hosts.
//!
//! Discovery runs in fixed-size concurrent batches; results flow back to
//! this single aggregating loop through [`JoinSet`] completions, so no lock
//! guards the active-host set. The deep scan then walks active hosts one at
//! a time, with concurrency internal to the port scanner. Discovery always
//! finishes before the first deep scan starts.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime};

use lanprobe_common::config::ScanConfig;
use lanprobe_common::error::ScanError;
use lanprobe_common::network::host::HostRecord;
use lanprobe_common::network::range;
use lanprobe_common::vulns::VulnerabilityRecord;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::events::{EventSink, ScanEvent, ScanProgress};
use crate::{classify, portscan, probe, resolve, vulns};

const OP_STARTING: &str = "Starting network scan...";
const OP_DISCOVERING: &str = "Discovering hosts...";
const OP_PORT_SCAN: &str = "Scanning ports...";
const OP_COMPLETE: &str = "Scan completed";
const OP_STOPPED: &str = "Scan stopped";

/// Phase of the current (or last) scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Expanding,
    Discovering,
    DeepScanning,
    Complete,
    Cancelled,
    Error,
}

pub struct ScanEngine {
    cfg: Arc<ScanConfig>,
    state: Mutex<ScanState>,
    cancelled: AtomicBool,
    discovered: Mutex<HashMap<Ipv4Addr, HostRecord>>,
}

impl ScanEngine {
    pub fn new(cfg: ScanConfig) -> Self {
        Self {
            cfg: Arc::new(cfg),
            state: Mutex::new(ScanState::Idle),
            cancelled: AtomicBool::new(false),
            discovered: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap()
    }

    /// Requests a cooperative stop. Idempotent; safe from any thread.
    ///
    /// No new probes are issued after the flag is seen, in-flight probes
    /// finish normally, and the scan still returns its partial results as
    /// a regular outcome.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Snapshot of every host recorded so far, keyed by address.
    pub fn discovered_hosts(&self) -> HashMap<Ipv4Addr, HostRecord> {
        self.discovered.lock().unwrap().clone()
    }

    pub fn clear_results(&self) {
        self.discovered.lock().unwrap().clear();
    }

    pub fn analyze_vulnerabilities(&self, hosts: &[HostRecord]) -> Vec<VulnerabilityRecord> {
        vulns::analyze(hosts)
    }

    /// Scans a CIDR range end to end.
    ///
    /// Invalid ranges are tolerated: the expander falls back to the default
    /// home range instead of failing the call. The returned records are in
    /// deep-scan completion order; progress and host events stream through
    /// `sink` as documented in [`crate::events`].
    pub async fn scan(
        &self,
        range: &str,
        sink: &dyn EventSink,
    ) -> Result<Vec<HostRecord>, ScanError> {
        self.set_state(ScanState::Expanding);
        let candidates = range::expand_cidr(range);
        self.scan_candidates(candidates, sink).await
    }

    /// The phase machine behind [`Self::scan`], with the candidate list
    /// already expanded. Public so callers (and tests) can inject their own
    /// target sets.
    pub async fn scan_candidates(
        &self,
        candidates: Vec<Ipv4Addr>,
        sink: &dyn EventSink,
    ) -> Result<Vec<HostRecord>, ScanError> {
        // A fresh run clears the previous run's stop request.
        self.cancelled.store(false, Ordering::Relaxed);
        sink.emit(progress(None, 0, 0, OP_STARTING, false));

        let active = self.discover(&candidates, sink).await?;
        info!("{} active hosts after discovery", active.len());

        let results = self.deep_scan_all(&active, sink).await;

        if self.is_cancelled() {
            self.set_state(ScanState::Cancelled);
            sink.emit(progress(None, results.len(), active.len(), OP_STOPPED, true));
        } else {
            self.set_state(ScanState::Complete);
            sink.emit(progress(None, active.len(), active.len(), OP_COMPLETE, true));
        }
        Ok(results)
    }

    /// Liveness sweep over all candidates, batched. Returns active hosts
    /// in probe-completion order, each recorded at most once.
    async fn discover(
        &self,
        candidates: &[Ipv4Addr],
        sink: &dyn EventSink,
    ) -> Result<Vec<Ipv4Addr>, ScanError> {
        self.set_state(ScanState::Discovering);
        let total = candidates.len();
        let mut active: Vec<Ipv4Addr> = Vec::new();
        let mut completed = 0usize;

        for batch in candidates.chunks(self.cfg.discovery_batch.max(1)) {
            if self.is_cancelled() {
                break;
            }

            let mut probes = JoinSet::new();
            for &addr in batch {
                let cfg = Arc::clone(&self.cfg);
                probes.spawn(async move { (addr, probe::is_reachable(addr, &cfg).await) });
            }

            while let Some(outcome) = probes.join_next().await {
                let (addr, reachable) = match outcome {
                    Ok(pair) => pair,
                    Err(err) => return Err(self.fail(err)),
                };
                completed += 1;

                if reachable && !active.contains(&addr) {
                    debug!("host {addr} is up");
                    active.push(addr);
                    let record = HostRecord::reachable(addr);
                    self.discovered.lock().unwrap().insert(addr, record.clone());
                    sink.emit(ScanEvent::HostDiscovered(record));
                }
                sink.emit(progress(Some(addr), completed, total, OP_DISCOVERING, false));
            }
        }
        Ok(active)
    }

    /// Walks active hosts sequentially, replacing each minimal record with
    /// the detailed one. Stops between hosts when cancelled; the records
    /// already produced stay valid.
    async fn deep_scan_all(&self, active: &[Ipv4Addr], sink: &dyn EventSink) -> Vec<HostRecord> {
        self.set_state(ScanState::DeepScanning);
        let mut results = Vec::with_capacity(active.len());

        for (idx, &addr) in active.iter().enumerate() {
            if self.is_cancelled() {
                break;
            }
            sink.emit(progress(Some(addr), idx, active.len(), OP_PORT_SCAN, false));

            let record = self.deep_scan(addr).await;
            self.discovered.lock().unwrap().insert(addr, record.clone());
            sink.emit(ScanEvent::HostDiscovered(record.clone()));
            results.push(record);
        }
        results
    }

    async fn deep_scan(&self, addr: Ipv4Addr) -> HostRecord {
        let started = Instant::now();

        let hostname = resolve::reverse_lookup(addr, self.cfg.dns_timeout).await;
        let (os_label, category) = classify::from_hostname(hostname.as_deref(), addr);
        let (open_ports, services) = portscan::scan_ports(addr, &self.cfg).await;
        let category = classify::refine_from_ports(category, &open_ports);

        HostRecord {
            addr,
            hostname,
            os_label: os_label.to_string(),
            reachable: true,
            open_ports,
            services,
            rtt_ms: started.elapsed().as_millis() as u64,
            hardware_addr: None,
            vendor: None,
            signal_dbm: -1,
            category,
            last_seen: SystemTime::now(),
            vulnerability_count: 0,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn set_state(&self, state: ScanState) {
        *self.state.lock().unwrap() = state;
    }

    /// Worker panics are the one failure that surfaces to the caller.
    fn fail(&self, err: tokio::task::JoinError) -> ScanError {
        self.set_state(ScanState::Error);
        ScanError::Runtime(err.to_string())
    }
}

fn progress(
    current_host: Option<Ipv4Addr>,
    completed: usize,
    total: usize,
    operation: &'static str,
    is_complete: bool,
) -> ScanEvent {
    ScanEvent::Progress(ScanProgress {
        current_host,
        completed,
        total,
        operation,
        is_complete,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
