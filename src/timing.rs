//! Best-of-N measurement of a simulation call.
//!
//! A measurement primes the callable once (untimed), then times `cycles`
//! further calls with a monotonic clock. The mean of the results is the
//! reported loss; the minimum duration is the reported speed.
//!
//! Log emission on the calling thread is switched off for the whole loop and
//! switched back on when the guard drops, which also happens on `?` returns
//! and during unwinding.

use std::fs::OpenOptions;
use std::io::Write;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use tracing::Dispatch;
use tracing::dispatcher::{self, DefaultGuard};

use crate::config::TimingConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Arithmetic mean of the timed results.
    pub mean_result: f64,
    /// Shortest timed call.
    pub best: Duration,
    /// Every timed call, in order.
    pub durations: Vec<Duration>,
}

/// Mutes the thread's default subscriber until the guard drops.
fn quiet_logs() -> DefaultGuard {
    dispatcher::set_default(&Dispatch::none())
}

/// Prime `f` once, then time `cycles` calls.
///
/// The first error aborts the measurement and is returned as-is.
pub fn measure<E, F>(cycles: NonZeroUsize, mut f: F) -> std::result::Result<Measurement, E>
where
    F: FnMut() -> std::result::Result<f64, E>,
{
    let _quiet = quiet_logs();

    f()?;

    let mut total = 0.0;
    let mut durations = Vec::with_capacity(cycles.get());
    for _ in 0..cycles.get() {
        let start = Instant::now();
        let value = f()?;
        durations.push(start.elapsed());
        total += value;
    }

    let best = durations.iter().copied().min().unwrap_or_default();
    Ok(Measurement { mean_result: total / cycles.get() as f64, best, durations })
}

/// Tab-separated record: each input `{:>10.6}`, then the best time in seconds.
pub fn record_line(fields: &[f64], best: Duration) -> String {
    let mut line = fields.iter().map(|v| format!("{v:>10.6}")).collect::<Vec<_>>().join("\t");
    line.push_str(&format!("\t{:5.4}", best.as_secs_f64()));
    line
}

/// Append `line` to the configured record file, or print it to stdout.
pub fn emit_record(config: &TimingConfig, line: &str) -> Result<()> {
    match &config.record_path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")?;
        }
        None => println!("{line}"),
    }
    Ok(())
}
