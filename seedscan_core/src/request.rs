//! Request and result types for a window scan.

use crate::error::ScanError;
use serde::{Deserialize, Serialize};

/// Default number of samples drawn per candidate second.
pub const DEFAULT_TRIAL_COUNT: i64 = 10_000;

/// Default length of the scanned window in seconds.
pub const DEFAULT_WINDOW_SECONDS: i64 = 600;

/// Input to a window scan.
///
/// The anchor is always explicit: resolving "now" is the caller's job, which
/// keeps every scan a pure function of its request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Target success percentage, expected in `[0, 100]` (not validated)
    pub success_rate: f64,

    /// Samples drawn per second
    pub trial_count: i64,

    /// Number of candidate seconds, starting at the anchor
    pub window_seconds: i64,

    /// Assumed latency subtracted from the winning second
    pub buffer_seconds: i64,

    /// First candidate second (unix epoch seconds)
    pub anchor_time_seconds: i64,
}

impl SimulationRequest {
    /// Creates a request with default trial count, window and buffer.
    pub fn new(success_rate: f64, anchor_time_seconds: i64) -> Self {
        Self {
            success_rate,
            trial_count: DEFAULT_TRIAL_COUNT,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            buffer_seconds: 0,
            anchor_time_seconds,
        }
    }

    /// Sets the number of samples per second.
    pub fn with_trial_count(mut self, trial_count: i64) -> Self {
        self.trial_count = trial_count;
        self
    }

    /// Sets the window length.
    pub fn with_window_seconds(mut self, window_seconds: i64) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    /// Sets the latency buffer.
    pub fn with_buffer_seconds(mut self, buffer_seconds: i64) -> Self {
        self.buffer_seconds = buffer_seconds;
        self
    }

    /// Checks the integer fields.
    ///
    /// `success_rate` is deliberately left alone; out-of-range values
    /// saturate classification instead of failing.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.trial_count <= 0 {
            return Err(ScanError::invalid(format!(
                "trial_count must be positive, got {}",
                self.trial_count
            )));
        }
        if self.window_seconds <= 0 {
            return Err(ScanError::invalid(format!(
                "window_seconds must be positive, got {}",
                self.window_seconds
            )));
        }
        if self.buffer_seconds < 0 {
            return Err(ScanError::invalid(format!(
                "buffer_seconds must not be negative, got {}",
                self.buffer_seconds
            )));
        }
        if self.anchor_time_seconds.checked_add(self.window_seconds).is_none() {
            return Err(ScanError::invalid("window extends past the representable time range"));
        }
        if self.anchor_time_seconds.checked_sub(self.buffer_seconds).is_none() {
            return Err(ScanError::invalid("buffer moves the result before the representable time range"));
        }
        Ok(())
    }

    /// Seed for the second at `offset` within the window.
    pub fn seed_at(&self, offset: usize) -> i64 {
        self.anchor_time_seconds + offset as i64
    }
}

/// Score of a single candidate second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerSecondResult {
    /// Position within the window
    pub second_offset: usize,

    /// Seed the batch was drawn from (`anchor + offset`)
    pub seed: i64,

    /// Averaged predicate count, in `[0, trial_count]`
    pub score: f64,

    /// Low-end predicate hits
    pub positive_count: u64,

    /// High-end predicate hits
    pub negative_count: u64,
}

/// Outcome of a window scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Winning seed minus the buffer
    pub best_time_seconds: i64,

    /// Winning score as a percentage of the trial count
    pub best_rate_percentage: f64,

    /// Window offset of the winning second
    pub best_offset: usize,
}

impl SimulationResult {
    /// Returns the `(best_time_seconds, best_rate_percentage)` pair.
    pub fn as_pair(&self) -> (i64, f64) {
        (self.best_time_seconds, self.best_rate_percentage)
    }
}
