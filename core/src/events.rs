//! # Scan Event Stream
//!
//! Everything the engine tells the outside world flows through one
//! [`EventSink`]. Sinks are invoked synchronously from worker context, so
//! implementations must be cheap and must not assume a particular thread.
//!
//! Delivery-order guarantees:
//! * progress events arrive in probe-completion order; their `completed`
//!   counter never decreases within a phase,
//! * every host-discovered event carries a self-consistent record for the
//!   current phase (minimal after discovery, full after the deep scan),
//! * the last progress event of any scan has `is_complete = true`.

use std::net::Ipv4Addr;

use lanprobe_common::network::host::HostRecord;
use tokio::sync::mpsc::UnboundedSender;

/// Full snapshot of scan progress, re-emitted on every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    pub current_host: Option<Ipv4Addr>,
    pub completed: usize,
    pub total: usize,
    pub operation: &'static str,
    pub is_complete: bool,
}

#[derive(Debug, Clone)]
pub enum ScanEvent {
    Progress(ScanProgress),
    HostDiscovered(HostRecord),
}

/// Receiver end of the engine's notifications.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

impl<F> EventSink for F
where
    F: Fn(ScanEvent) + Send + Sync,
{
    fn emit(&self, event: ScanEvent) {
        self(event)
    }
}

/// Lets callers subscribe with a plain unbounded channel. Send failures
/// mean the receiver hung up, which is not the scan's problem.
pub struct ChannelSink(pub UnboundedSender<ScanEvent>);

impl EventSink for ChannelSink {
    fn emit(&self, event: ScanEvent) {
        let _ = self.0.send(event);
    }
}

/// Swallows every event, for callers that only want the return value.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ScanEvent) {}
}
