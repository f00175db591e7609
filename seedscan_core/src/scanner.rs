//! Window Scanner - per-second scoring and best-second selection.
//!
//! Both execution modes share one reduction: seconds are visited in
//! ascending offset order and a second only replaces the running best when
//! its score is strictly greater. Ties therefore keep the earliest second,
//! and a window where nothing scores above zero falls back to the anchor.
//!
//! The parallel mode fans the per-second work out over a rayon pool and
//! collects through an indexed iterator, so results come back in offset
//! order no matter which worker finished first.

use crate::classify::{tally, Objective, Tally, Threshold};
use crate::error::{SampleError, ScanError};
use crate::request::{PerSecondResult, SimulationRequest, SimulationResult};
use crate::sampler::{RandMaxSampler, SeededSampler};

use rayon::prelude::*;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, debug_span, info};

/// Receives every scored second, in ascending offset order.
pub trait ScanObserver {
    fn on_second(&mut self, second: &PerSecondResult);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_second(&mut self, _second: &PerSecondResult) {}
}

/// Emits one `debug` event per second.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_second(&mut self, second: &PerSecondResult) {
        debug!(
            seed = second.seed,
            positive = second.positive_count,
            negative = second.negative_count,
            score = second.score,
            "second scored"
        );
    }
}

/// Keeps every scored second.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub seconds: Vec<PerSecondResult>,
}

impl ScanObserver for RecordingObserver {
    fn on_second(&mut self, second: &PerSecondResult) {
        self.seconds.push(*second);
    }
}

/// Running best over the window.
struct BestSecond {
    score: f64,
    seed: i64,
    offset: usize,
}

impl BestSecond {
    fn new(anchor: i64) -> Self {
        Self {
            score: 0.0,
            seed: anchor,
            offset: 0,
        }
    }

    fn offer(&mut self, second: &PerSecondResult) {
        if second.score > self.score {
            self.score = second.score;
            self.seed = second.seed;
            self.offset = second.second_offset;
        }
    }

    fn finish(self, req: &SimulationRequest) -> SimulationResult {
        SimulationResult {
            best_time_seconds: self.seed - req.buffer_seconds,
            best_rate_percentage: self.score / req.trial_count as f64 * 100.0,
            best_offset: self.offset,
        }
    }
}

/// Scans a window of seconds for the one whose batch scores best.
pub struct WindowScanner<S = RandMaxSampler> {
    sampler: S,
    objective: Objective,
}

impl WindowScanner<RandMaxSampler> {
    /// Creates a scanner over the default sampler.
    pub fn new(objective: Objective) -> Self {
        Self::with_sampler(RandMaxSampler, objective)
    }

    /// Scanner looking for the most successful second.
    pub fn success() -> Self {
        Self::new(Objective::Success)
    }

    /// Scanner looking for the least successful second.
    pub fn failure() -> Self {
        Self::new(Objective::Failure)
    }
}

impl Default for WindowScanner<RandMaxSampler> {
    fn default() -> Self {
        Self::success()
    }
}

impl<S: SeededSampler> WindowScanner<S> {
    /// Creates a scanner over a custom sampler.
    pub fn with_sampler(sampler: S, objective: Objective) -> Self {
        Self { sampler, objective }
    }

    /// Returns the scan objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Samples and classifies the batch for one seed.
    pub fn tally_second(
        &self,
        seed: i64,
        threshold: Threshold,
        trial_count: usize,
    ) -> Result<Tally, SampleError> {
        let samples = self.sampler.sample(seed, trial_count)?;
        Ok(tally(&samples, threshold, self.objective))
    }

    /// Sequential scan.
    pub fn scan(&self, req: &SimulationRequest) -> Result<SimulationResult, ScanError> {
        self.scan_observed(req, &mut NoopObserver)
    }

    /// Sequential scan reporting every second to `observer`.
    pub fn scan_observed(
        &self,
        req: &SimulationRequest,
        observer: &mut dyn ScanObserver,
    ) -> Result<SimulationResult, ScanError> {
        req.validate()?;
        let span = debug_span!("scan", mode = "sequential", objective = %self.objective);
        let _enter = span.enter();
        let started = Instant::now();

        let threshold = Threshold::from_percentage(req.success_rate);
        let trials = req.trial_count as usize;
        let mut best = BestSecond::new(req.anchor_time_seconds);

        for offset in 0..req.window_seconds as usize {
            let seed = req.seed_at(offset);
            let tally = self
                .tally_second(seed, threshold, trials)
                .map_err(|source| ScanError::Sampler { seed, source })?;
            record(offset, seed, tally, &mut best, observer);
        }

        let result = best.finish(req);
        log_result(req, &result, started);
        Ok(result)
    }

    /// Parallel scan; same result as [`scan`](Self::scan) for the same request.
    pub fn scan_parallel(&self, req: &SimulationRequest) -> Result<SimulationResult, ScanError> {
        self.scan_parallel_observed(req, &mut NoopObserver)
    }

    /// Parallel scan reporting every second to `observer`.
    ///
    /// The observer runs on the calling thread during the ordered reduction,
    /// after all workers have finished.
    pub fn scan_parallel_observed(
        &self,
        req: &SimulationRequest,
        observer: &mut dyn ScanObserver,
    ) -> Result<SimulationResult, ScanError> {
        req.validate()?;
        let span = debug_span!("scan", mode = "parallel", objective = %self.objective);
        let _enter = span.enter();
        let started = Instant::now();

        let threshold = Threshold::from_percentage(req.success_rate);
        let trials = req.trial_count as usize;
        let window = req.window_seconds as usize;

        let pool = worker_pool()?;
        debug!(workers = pool.current_num_threads(), window, "dispatching per-second tasks");

        // install() returns once every task has completed. Dropping the pool
        // afterwards only signals its idle threads to exit; it does not join them.
        let tallies = pool.install(|| {
            (0..window)
                .into_par_iter()
                .map(|offset| self.run_task(req, offset, threshold, trials))
                .collect::<Result<Vec<Tally>, ScanError>>()
        });
        drop(pool);
        let tallies = tallies?;

        let mut best = BestSecond::new(req.anchor_time_seconds);
        for (offset, tally) in tallies.into_iter().enumerate() {
            record(offset, req.seed_at(offset), tally, &mut best, observer);
        }

        let result = best.finish(req);
        log_result(req, &result, started);
        Ok(result)
    }

    /// One worker task. Sampler errors and panics both become a
    /// [`ScanError::WorkerFailure`] for this offset.
    fn run_task(
        &self,
        req: &SimulationRequest,
        offset: usize,
        threshold: Threshold,
        trials: usize,
    ) -> Result<Tally, ScanError> {
        let seed = req.seed_at(offset);
        match panic::catch_unwind(AssertUnwindSafe(|| self.tally_second(seed, threshold, trials))) {
            Ok(Ok(tally)) => Ok(tally),
            Ok(Err(e)) => Err(ScanError::worker(offset, e)),
            Err(payload) => Err(ScanError::worker(offset, panic_message(payload.as_ref()))),
        }
    }
}

fn record(
    offset: usize,
    seed: i64,
    tally: Tally,
    best: &mut BestSecond,
    observer: &mut dyn ScanObserver,
) {
    let second = PerSecondResult {
        second_offset: offset,
        seed,
        score: tally.score(),
        positive_count: tally.positive,
        negative_count: tally.negative,
    };
    observer.on_second(&second);
    best.offer(&second);
}

fn log_result(req: &SimulationRequest, result: &SimulationResult, started: Instant) {
    info!(
        success_rate = req.success_rate,
        anchor = req.anchor_time_seconds,
        window = req.window_seconds,
        trials = req.trial_count,
        best_time = result.best_time_seconds,
        best_rate = result.best_rate_percentage,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );
}

/// Builds a pool sized to the machine's available parallelism.
fn worker_pool() -> Result<rayon::ThreadPool, ScanError> {
    let threads = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("seedscan-worker-{}", i))
        .build()
        .map_err(|e| ScanError::WorkerPool(e.to_string()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
