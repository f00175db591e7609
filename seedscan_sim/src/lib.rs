//! SeedScan runner
//!
//! The thin caller around `seedscan_core`: it owns everything the core
//! refuses to touch.
//!
//! - **Time**: "now" comes from a [`Clock`], so the core stays deterministic
//! - **Modes**: sequential, parallel and the failure-seeking variants
//! - **Reports**: human-readable text and JSON
//!
//! # Usage
//!
//! ```ignore
//! use seedscan_sim::{RunMode, ScanRunner};
//!
//! let runner = ScanRunner::new().with_window_seconds(120);
//! let outcome = runner.run(RunMode::Parallel, 30.0)?;
//! println!("{}", seedscan_sim::report::render_text(&outcome, runner.now()));
//! ```

mod clock;
mod error;
mod runner;
pub mod report;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::RunError;
pub use runner::{Comparison, RunMode, RunOutcome, ScanRunner};
