use thiserror::Error;

/// Failures a scan can surface to its caller.
///
/// Per-host and per-port failures never show up here: an unreachable
/// candidate or a refused connect is a normal result, not an error.
/// `InvalidRange` is recovered internally by falling back to the default
/// range, so in practice only `Runtime` ever reaches the caller.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid network range '{0}'")]
    InvalidRange(String),
    #[error("scan worker failed: {0}")]
    Runtime(String),
}
