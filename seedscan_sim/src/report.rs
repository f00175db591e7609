//! Text and JSON rendering of scan outcomes.

use crate::error::RunError;
use crate::runner::{Comparison, RunOutcome};

use chrono::{Local, TimeZone};

/// Display format for winning seconds, e.g. `Tuesday, November 14, 2023 10:13:20`.
pub const TIME_FORMAT: &str = "%A, %B %d, %Y %I:%M:%S";

/// Formats unix seconds in the given time zone.
pub fn format_timestamp_in<Tz: TimeZone>(seconds: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_opt(seconds, 0).single() {
        Some(time) => time.format(TIME_FORMAT).to_string(),
        None => format!("{}s since epoch", seconds),
    }
}

/// Formats unix seconds in the local time zone.
pub fn format_timestamp(seconds: i64) -> String {
    format_timestamp_in(seconds, &Local)
}

/// Formats a remaining duration as `MM:SS`. Elapsed targets show `00:00`.
pub fn format_countdown(remaining_secs: i64) -> String {
    let remaining = remaining_secs.max(0);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

/// Renders a single outcome for the terminal.
pub fn render_text(outcome: &RunOutcome, now: i64) -> String {
    let req = &outcome.request;
    let result = &outcome.result;
    let label = if outcome.mode.is_worst() { "failed" } else { "succeeded" };

    [
        format!("Mode:            {} ({})", outcome.mode, outcome.mode.description()),
        format!("Input rate:      {:.2}%", req.success_rate),
        format!(
            "Window:          {}s from {} ({} trials/s, {}s buffer)",
            req.window_seconds,
            format_timestamp(req.anchor_time_seconds),
            req.trial_count,
            req.buffer_seconds
        ),
        format!("Best {} rate: {:.2}%", label, result.best_rate_percentage),
        format!("Best time:       {}", format_timestamp(result.best_time_seconds)),
        format!("Countdown:       {}", format_countdown(result.best_time_seconds - now)),
        format!("Scan time:       {}ms", outcome.elapsed_ms),
    ]
    .join("\n")
}

/// Renders a sequential/parallel comparison for the terminal.
pub fn render_comparison_text(comparison: &Comparison, now: i64) -> String {
    let verdict = if comparison.identical { "identical" } else { "DIFFERENT" };
    let summary = match comparison.speedup() {
        Some(speedup) => format!("Results:         {} (parallel speedup {:.1}x)", verdict, speedup),
        None => format!("Results:         {}", verdict),
    };

    [
        render_text(&comparison.sequential, now),
        "---".to_string(),
        render_text(&comparison.parallel, now),
        "---".to_string(),
        summary,
    ]
    .join("\n")
}

/// Renders an outcome as pretty JSON.
pub fn render_json(outcome: &RunOutcome) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Renders a comparison as pretty JSON.
pub fn render_comparison_json(comparison: &Comparison) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(comparison)?)
}
