//! Platform error taxonomy.
//!
//! Nothing here is fatal to the process: callers log and degrade
//! (skip a tick, fall back to inexact scheduling, retry on the next
//! liveness check) rather than propagate upward.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Calendar query failed (I/O error, revoked permission)
    #[error("event source unavailable: {0}")]
    SourceUnavailable(String),

    /// Exact wake scheduling permission is missing
    #[error("exact wake scheduling denied")]
    ExactWakeDenied,

    /// Indicator create/show failed
    #[error("indicator presentation failed: {0}")]
    Presentation(String),

    /// Process start request was rejected
    #[error("process start failed: {0}")]
    ProcessStart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
