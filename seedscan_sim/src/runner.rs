//! Scan runner - resolves the anchor and drives the core scanner.

use crate::clock::{Clock, SystemClock};
use crate::error::RunError;

use seedscan_core::request::{DEFAULT_TRIAL_COUNT, DEFAULT_WINDOW_SECONDS};
use seedscan_core::{SimulationRequest, SimulationResult, TracingObserver, WindowScanner};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// How a scan is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Best second, single thread
    Sequential,

    /// Best second, worker pool
    Parallel,

    /// Worst second, worker pool
    Worst,

    /// Worst second, single thread
    WorstSequential,
}

impl RunMode {
    /// Returns all modes.
    pub fn all() -> Vec<RunMode> {
        vec![
            RunMode::Sequential,
            RunMode::Parallel,
            RunMode::Worst,
            RunMode::WorstSequential,
        ]
    }

    /// Returns the mode name.
    pub fn name(&self) -> &'static str {
        match self {
            RunMode::Sequential => "sequential",
            RunMode::Parallel => "parallel",
            RunMode::Worst => "worst",
            RunMode::WorstSequential => "worst_sequential",
        }
    }

    /// Returns a description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            RunMode::Sequential => "Best success second, scanned one second at a time",
            RunMode::Parallel => "Best success second, scanned across all CPU cores",
            RunMode::Worst => "Best failure second, scanned across all CPU cores",
            RunMode::WorstSequential => "Best failure second, scanned one second at a time",
        }
    }

    /// Returns true if the mode looks for the least successful second.
    pub fn is_worst(&self) -> bool {
        matches!(self, RunMode::Worst | RunMode::WorstSequential)
    }

    /// Returns true if the mode uses the worker pool.
    pub fn is_parallel(&self) -> bool {
        matches!(self, RunMode::Parallel | RunMode::Worst)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" | "v1" => Ok(RunMode::Sequential),
            "parallel" | "par" | "v2" => Ok(RunMode::Parallel),
            "worst" | "failed" | "worst_parallel" => Ok(RunMode::Worst),
            "worst_sequential" | "worst_seq" => Ok(RunMode::WorstSequential),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}

/// Result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Mode that was run
    pub mode: RunMode,

    /// Fully resolved request
    pub request: SimulationRequest,

    /// Scan result
    pub result: SimulationResult,

    /// Wall time spent scanning
    pub elapsed_ms: u64,
}

/// Sequential and parallel runs over the same request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub sequential: RunOutcome,
    pub parallel: RunOutcome,

    /// True if both modes produced the same result
    pub identical: bool,
}

impl Comparison {
    /// Sequential time divided by parallel time.
    pub fn speedup(&self) -> Option<f64> {
        if self.parallel.elapsed_ms == 0 {
            return None;
        }
        Some(self.sequential.elapsed_ms as f64 / self.parallel.elapsed_ms as f64)
    }
}

/// Builds requests from the numeric overrides and runs them.
pub struct ScanRunner<C = SystemClock> {
    clock: C,
    trial_count: i64,
    window_seconds: i64,
    buffer_seconds: i64,
    anchor: Option<i64>,
}

impl ScanRunner<SystemClock> {
    /// Creates a runner on the system clock with default settings.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ScanRunner<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ScanRunner<C> {
    /// Creates a runner on a custom clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            trial_count: DEFAULT_TRIAL_COUNT,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            buffer_seconds: 0,
            anchor: None,
        }
    }

    /// Sets the samples per second.
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

    /// Pins the anchor instead of reading the clock.
    pub fn with_anchor(mut self, anchor: Option<i64>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Current time according to the runner's clock.
    pub fn now(&self) -> i64 {
        self.clock.now_unix_seconds()
    }

    /// Builds the request for `success_rate`, reading the clock if no
    /// anchor is pinned.
    pub fn request(&self, success_rate: f64) -> SimulationRequest {
        let anchor = self.anchor.unwrap_or_else(|| self.clock.now_unix_seconds());
        SimulationRequest::new(success_rate, anchor)
            .with_trial_count(self.trial_count)
            .with_window_seconds(self.window_seconds)
            .with_buffer_seconds(self.buffer_seconds)
    }

    /// Runs one scan.
    pub fn run(&self, mode: RunMode, success_rate: f64) -> Result<RunOutcome, RunError> {
        let request = self.request(success_rate);
        self.run_request(mode, request)
    }

    /// Runs one scan on an already resolved request.
    pub fn run_request(
        &self,
        mode: RunMode,
        request: SimulationRequest,
    ) -> Result<RunOutcome, RunError> {
        if !(0.0..=100.0).contains(&request.success_rate) {
            warn!(
                success_rate = request.success_rate,
                "success rate outside [0, 100]; classification will saturate"
            );
        }
        info!(
            "Starting {} scan: rate={}% anchor={} window={}s trials={}",
            mode, request.success_rate, request.anchor_time_seconds,
            request.window_seconds, request.trial_count
        );

        let scanner = if mode.is_worst() {
            WindowScanner::failure()
        } else {
            WindowScanner::success()
        };
        let mut observer = TracingObserver;

        let started = Instant::now();
        let result = if mode.is_parallel() {
            scanner.scan_parallel_observed(&request, &mut observer)?
        } else {
            scanner.scan_observed(&request, &mut observer)?
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!("{} scan finished in {}ms", mode, elapsed_ms);
        Ok(RunOutcome {
            mode,
            request,
            result,
            elapsed_ms,
        })
    }

    /// Runs the sequential and parallel success scans on the same anchor.
    pub fn compare(&self, success_rate: f64) -> Result<Comparison, RunError> {
        let request = self.request(success_rate);
        let sequential = self.run_request(RunMode::Sequential, request)?;
        let parallel = self.run_request(RunMode::Parallel, request)?;
        let identical = sequential.result == parallel.result;

        if !identical {
            warn!(
                "Sequential {:?} and parallel {:?} results differ",
                sequential.result.as_pair(),
                parallel.result.as_pair()
            );
        }

        Ok(Comparison {
            sequential,
            parallel,
            identical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use seedscan_core::ScanError;

    const NOW: i64 = 1_700_000_000;

    fn runner() -> ScanRunner<FixedClock> {
        ScanRunner::with_clock(FixedClock::new(NOW))
            .with_trial_count(200)
            .with_window_seconds(5)
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        for mode in RunMode::all() {
            assert_eq!(mode.name().parse::<RunMode>().unwrap(), mode);
        }
        assert_eq!("V2".parse::<RunMode>().unwrap(), RunMode::Parallel);
        assert!("fastest".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_mode_flags() {
        assert!(RunMode::Worst.is_worst());
        assert!(RunMode::Worst.is_parallel());
        assert!(!RunMode::Sequential.is_parallel());
        assert!(RunMode::WorstSequential.is_worst());
    }

    #[test]
    fn test_request_uses_clock_when_unpinned() {
        let clock = FixedClock::new(NOW);
        let runner = ScanRunner::with_clock(clock.clone());
        assert_eq!(runner.request(30.0).anchor_time_seconds, NOW);

        clock.advance(10);
        assert_eq!(runner.request(30.0).anchor_time_seconds, NOW + 10);
    }

    #[test]
    fn test_pinned_anchor_overrides_clock() {
        let req = runner().with_anchor(Some(42)).request(30.0);
        assert_eq!(req.anchor_time_seconds, 42);
        assert_eq!(req.trial_count, 200);
        assert_eq!(req.window_seconds, 5);
    }

    #[test]
    fn test_run_reports_mode_and_request() {
        let outcome = runner().run(RunMode::Parallel, 30.0).unwrap();
        assert_eq!(outcome.mode, RunMode::Parallel);
        assert_eq!(outcome.request.anchor_time_seconds, NOW);
        assert!((NOW..NOW + 5).contains(&outcome.result.best_time_seconds));
    }

    #[test]
    fn test_compare_is_identical() {
        let comparison = runner().with_buffer_seconds(3).compare(30.0).unwrap();
        assert!(comparison.identical);
        assert_eq!(comparison.sequential.request, comparison.parallel.request);
    }

    #[test]
    fn test_worst_modes_agree() {
        let runner = runner();
        let parallel = runner.run(RunMode::Worst, 20.0).unwrap();
        let sequential = runner.run(RunMode::WorstSequential, 20.0).unwrap();
        assert_eq!(parallel.result, sequential.result);
    }

    #[test]
    fn test_invalid_override_surfaces_scan_error() {
        let err = runner().with_window_seconds(-1).run(RunMode::Sequential, 30.0).unwrap_err();
        assert!(matches!(err, RunError::Scan(ScanError::InvalidArgument(_))));
    }
}
