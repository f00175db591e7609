//! SeedScan Core - time-seeded window scanning.
//!
//! Given a target success percentage, find the second in an upcoming window
//! whose time-derived seed produces the most favorable batch of samples.
//!
//! # Pipeline
//!
//! ```text
//! anchor + offset ──► SeededSampler ──► bucket % 10000 ──► Tally ──► score
//!                                                                     │
//!                        SimulationResult ◄── strict-max reduction ◄──┘
//! ```
//!
//! Each second is independent, so the window can be scored on a worker pool.
//! The reduction always walks seconds in offset order, which makes the
//! parallel scan return exactly what the sequential one does.
//!
//! # Example
//!
//! ```
//! use seedscan_core::{find_best_success_window, SimulationRequest};
//!
//! let req = SimulationRequest::new(30.0, 1_700_000_000)
//!     .with_trial_count(200)
//!     .with_window_seconds(5);
//! let result = find_best_success_window(&req).unwrap();
//! assert!(result.best_time_seconds >= 1_700_000_000);
//! ```

mod error;
pub mod classify;
pub mod request;
pub mod sampler;
pub mod scanner;

pub use classify::{Objective, Tally, Threshold, BUCKET_SPACE};
pub use error::{SampleError, ScanError};
pub use request::{PerSecondResult, SimulationRequest, SimulationResult};
pub use sampler::{RandMaxSampler, SeededSampler, RAND_MAX};
pub use scanner::{NoopObserver, RecordingObserver, ScanObserver, TracingObserver, WindowScanner};

/// Sequential scan for the most successful second.
pub fn find_best_success_window(req: &SimulationRequest) -> Result<SimulationResult, ScanError> {
    WindowScanner::success().scan(req)
}

/// Parallel scan for the most successful second.
pub fn find_best_success_window_parallel(
    req: &SimulationRequest,
) -> Result<SimulationResult, ScanError> {
    WindowScanner::success().scan_parallel(req)
}

/// Sequential scan for the least successful second.
pub fn find_worst_success_window(req: &SimulationRequest) -> Result<SimulationResult, ScanError> {
    WindowScanner::failure().scan(req)
}

/// Parallel scan for the least successful second.
pub fn find_worst_success_window_parallel(
    req: &SimulationRequest,
) -> Result<SimulationResult, ScanError> {
    WindowScanner::failure().scan_parallel(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_agree_per_objective() {
        let req = SimulationRequest::new(30.0, 1_700_000_000)
            .with_trial_count(200)
            .with_window_seconds(5);

        assert_eq!(
            find_best_success_window(&req).unwrap(),
            find_best_success_window_parallel(&req).unwrap()
        );
        assert_eq!(
            find_worst_success_window(&req).unwrap(),
            find_worst_success_window_parallel(&req).unwrap()
        );
    }

    #[test]
    fn test_entry_points_reject_empty_window() {
        let req = SimulationRequest::new(30.0, 0).with_window_seconds(0);
        assert!(matches!(
            find_best_success_window_parallel(&req),
            Err(ScanError::InvalidArgument(_))
        ));
    }
}
