//! # lanprobe-core
//!
//! The scanning engine: liveness probing, TCP port scanning, banner
//! grabbing, device classification and vulnerability analysis, sequenced by
//! [`engine::ScanEngine`] and reported through the [`events`] stream.

pub mod banner;
pub mod classify;
pub mod engine;
pub mod events;
pub mod portscan;
pub mod probe;
pub mod resolve;
pub mod vulns;
