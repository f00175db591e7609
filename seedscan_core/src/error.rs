//! Error types for the window scanner.

use thiserror::Error;

/// Errors raised by a [`SeededSampler`](crate::SeededSampler) implementation.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The backing generator could not produce a batch.
    #[error("Sampler backend error: {0}")]
    Backend(String),
}

impl SampleError {
    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors that abort a window scan.
///
/// A scan is read-only and idempotent, so every variant is safe to retry
/// by issuing the whole call again. No partial results are ever returned.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A request field is outside its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The sampler failed for a second in a sequential scan.
    #[error("Sampler failed for seed {seed}: {source}")]
    Sampler {
        seed: i64,
        #[source]
        source: SampleError,
    },

    /// A per-second task failed in a parallel scan.
    #[error("Worker failed at offset {offset}: {reason}")]
    WorkerFailure { offset: usize, reason: String },

    /// The worker pool could not be built.
    #[error("Worker pool unavailable: {0}")]
    WorkerPool(String),
}

impl ScanError {
    /// Creates an invalid-argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates a worker failure for the given window offset.
    pub fn worker(offset: usize, reason: impl std::fmt::Display) -> Self {
        Self::WorkerFailure {
            offset,
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error came from the parallel worker pool.
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, Self::WorkerFailure { .. } | Self::WorkerPool(_))
    }
}
