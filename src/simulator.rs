use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{LossInputs, TimingConfig};
use crate::error::Result;
use crate::registry::{self, StrategyDescriptor};
use crate::strategy::{Strategy, Workers};
use crate::timing::{self, Measurement};
use crate::types::SimulationRequest;
use crate::validation;
use crate::variates::VariateSource;

/// Strategy dispatch plus seeding. No statistics happen here.
pub struct Simulator {
    descriptor: &'static StrategyDescriptor,
    workers: Workers,
}

impl Simulator {
    pub fn new(strategy_id: i64) -> Result<Self> {
        let descriptor = registry::lookup(strategy_id)?;
        Ok(Self::from_descriptor(descriptor))
    }

    pub fn from_descriptor(descriptor: &'static StrategyDescriptor) -> Self {
        info!("Using strategy: {}", descriptor.strategy.name());
        Simulator { descriptor, workers: Workers::global() }
    }

    /// Cap the parallel strategies at `threads` workers.
    pub fn with_workers(mut self, threads: usize) -> Result<Self> {
        self.workers = Workers::capped(threads)?;
        Ok(self)
    }

    pub fn strategy(&self) -> Strategy {
        self.descriptor.strategy
    }

    /// Mean loss per simulated year for `request`.
    pub fn simulate(&self, request: &SimulationRequest) -> Result<f64> {
        let mut source = VariateSource::new(request.rng_seed);
        info!(
            seed = source.seed(),
            explicit = request.rng_seed.is_some(),
            "Setting the random number generator"
        );
        if self.strategy().is_parallel() {
            debug!(workers = self.workers.count(), "parallel strategy");
        }

        info!("Starting main loop over {} Monte Carlo samples", request.num_samples);
        let start = Instant::now();
        let mean_loss = self.strategy().execute(request, &mut source, &self.workers)?;
        debug!(elapsed = ?start.elapsed(), "End of main loop");

        info!("MEAN LOSS: {mean_loss}");
        Ok(mean_loss)
    }

    /// [`simulate`](Self::simulate) under the benchmark harness.
    pub fn simulate_timed(&self, request: &SimulationRequest, timing: &TimingConfig) -> Result<Measurement> {
        timing::measure(timing.cycles, || self.simulate(request))
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:16}", self.descriptor.strategy.name())
    }
}

/// Result of [`run_timed`]: the loss, plus the best duration when timing was on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunOutcome {
    pub strategy: Strategy,
    pub mean_loss: f64,
    pub best: Option<Duration>,
}

/// Validate `inputs` and run the selected strategy once.
pub fn run(inputs: &LossInputs) -> Result<f64> {
    Ok(run_with(inputs, None, &TimingConfig::disabled())?.mean_loss)
}

/// Validate `inputs` and run, timing the call when `timing.enabled`.
///
/// With timing on, the reported loss is the mean over all timed cycles and a
/// record line goes to the configured destination.
pub fn run_timed(inputs: &LossInputs, timing: &TimingConfig) -> Result<RunOutcome> {
    run_with(inputs, None, timing)
}

/// [`run_timed`] with an optional worker cap for the parallel strategies.
pub fn run_with(inputs: &LossInputs, workers: Option<usize>, timing: &TimingConfig) -> Result<RunOutcome> {
    let run = validation::validate(inputs)?;
    let mut simulator = Simulator::from_descriptor(run.descriptor);
    if let Some(threads) = workers {
        simulator = simulator.with_workers(threads)?;
    }
    let strategy = simulator.strategy();

    if !timing.enabled {
        let mean_loss = simulator.simulate(&run.request)?;
        return Ok(RunOutcome { strategy, mean_loss, best: None });
    }

    let measurement = simulator.simulate_timed(&run.request, timing)?;
    info!(
        cycles = timing.cycles.get(),
        best = ?measurement.best,
        "Timed {simulator}"
    );
    timing::emit_record(timing, &timing::record_line(&inputs.timing_fields(), measurement.best))?;

    Ok(RunOutcome { strategy, mean_loss: measurement.mean_result, best: Some(measurement.best) })
}
