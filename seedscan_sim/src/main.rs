//! SeedScan CLI
//!
//! Scan the upcoming window for the second whose time-seeded batch best
//! matches a target success rate.

use clap::Parser;
use seedscan_sim::report;
use seedscan_sim::{RunError, RunMode, ScanRunner};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// SeedScan window scanner
#[derive(Parser, Debug)]
#[command(name = "seedscan")]
#[command(about = "Find the most favorable second in an upcoming time window", long_about = None)]
struct Args {
    /// Target success rate in percent (expected 0-100)
    #[arg(short, long)]
    rate: f64,

    /// Samples drawn per candidate second
    #[arg(short, long, default_value = "10000")]
    trials: i64,

    /// Number of candidate seconds to scan
    #[arg(short, long, default_value = "600")]
    window: i64,

    /// Assumed latency in seconds, subtracted from the winning second
    #[arg(short, long, default_value = "0")]
    buffer: i64,

    /// First candidate second as unix time (default: now)
    #[arg(short, long, allow_negative_numbers = true)]
    anchor: Option<i64>,

    /// Scan mode (sequential, parallel, worst, worst_sequential)
    #[arg(short, long, default_value = "parallel")]
    mode: RunMode,

    /// Run sequential and parallel scans and check they agree
    #[arg(long)]
    compare: bool,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Verbose output (per-second scores)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn run(args: &Args) -> Result<bool, RunError> {
    let runner = ScanRunner::new()
        .with_trial_count(args.trials)
        .with_window_seconds(args.window)
        .with_buffer_seconds(args.buffer)
        .with_anchor(args.anchor);

    if args.compare {
        let comparison = runner.compare(args.rate)?;
        if args.json {
            println!("{}", report::render_comparison_json(&comparison)?);
        } else {
            println!("{}", report::render_comparison_text(&comparison, runner.now()));
        }
        return Ok(comparison.identical);
    }

    let outcome = runner.run(args.mode, args.rate)?;
    if args.json {
        println!("{}", report::render_json(&outcome)?);
    } else {
        println!("{}", report::render_text(&outcome, runner.now()));
    }
    Ok(true)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.json {
        info!("SeedScan v{}", env!("CARGO_PKG_VERSION"));
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => {
            error!("Sequential and parallel scans disagree");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Scan failed: {}", e);
            std::process::exit(1);
        }
    }
}
