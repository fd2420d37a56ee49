use std::env;
use std::time::Instant;

use hurricane_loss::registry::catalog;
use hurricane_loss::{LossInputs, run};

/// Run every registered strategy on the canonical inputs and report how far
/// each lands from strategy 0.
///
/// Usage: compare-strategies [SAMPLES] [SEED]
fn main() {
    let mut inputs = LossInputs::canonical();

    if let Some(n) = env::args().nth(1).and_then(|s| s.parse().ok()) {
        inputs.num_monte_carlo_samples = n;
    }
    if let Some(seed) = env::args().nth(2).and_then(|s| s.parse().ok()) {
        inputs.rng_seed = Some(seed);
    }

    eprintln!(
        "compare-strategies: {} samples, seed {:?}",
        inputs.num_monte_carlo_samples, inputs.rng_seed
    );
    println!("{:>3} | {:<17} | {:>14} | {:>9} | {:>10}", "id", "strategy", "mean loss", "rel dev", "elapsed");
    println!("{}", "-".repeat(66));

    let mut reference: Option<f64> = None;
    for d in catalog() {
        inputs.strategy_id = i64::from(d.id);
        let start = Instant::now();
        let mean = run(&inputs).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });
        let elapsed = start.elapsed();

        let base = *reference.get_or_insert(mean);
        let rel = if base == 0.0 { 0.0 } else { (mean - base) / base };
        println!(
            "{:>3} | {:<17} | {:>14.6} | {:>8.4}% | {:>10.3?}",
            d.id,
            d.strategy.name(),
            mean,
            rel * 100.0,
            elapsed
        );
    }
}
