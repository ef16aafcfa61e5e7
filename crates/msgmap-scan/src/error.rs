//! Scan error types.
//!
//! Routine data absence (an unresolvable argument, a missing payload type)
//! is not an error -- extraction degrades to absent fields. [`ScanError`]
//! covers the conditions that abort a scan: a malformed marker declaration,
//! cooperative cancellation, and snapshot loading failures.

use thiserror::Error;

/// Errors produced while scanning a workspace snapshot.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A matched marker type exposes no constructor parameter list. This is
    /// a host-configuration defect, not routine data absence: the scan
    /// aborts rather than shipping an incomplete catalog.
    #[error("marker '{marker}' has no discoverable constructor parameters")]
    MarkerShape { marker: String },

    /// The scan was cancelled between source units.
    #[error("scan cancelled")]
    Cancelled,

    /// The workspace snapshot could not be parsed.
    #[error("snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The workspace snapshot could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
