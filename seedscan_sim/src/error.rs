//! Error types for the scan runner.

use seedscan_core::ScanError;
use thiserror::Error;

/// Errors that can occur while running or reporting a scan.
#[derive(Debug, Error)]
pub enum RunError {
    /// The core scan failed
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
