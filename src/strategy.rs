use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::region::LossModel;
use crate::types::SimulationRequest;
use crate::variates::VariateSource;

/// Algorithms for the mean annual loss.
///
/// Every variant computes
/// Σ_years (Σ Florida severities + Σ Gulf severities) / num_samples.
/// They differ only in loop shape and in the order randomness is consumed, so
/// results agree statistically but not bit-for-bit. Discriminants are the
/// stable registry ids: append, never renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Per year: Florida count, each Florida severity, Gulf count, each Gulf severity.
    Sequential = 0,
    /// All Florida counts, then all Gulf counts, then per-year severity loops.
    Precounted = 1,
    /// Years split across workers, each running `Sequential` on its share.
    Parallel = 2,
    /// Counts in one batch per region, then the summed number of severities
    /// in batches.
    Batched = 3,
    /// Years split across workers, each running `Batched` on its share.
    ParallelBatched = 4,
}

impl Strategy {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Precounted => "precounted",
            Strategy::Parallel => "parallel",
            Strategy::Batched => "batched",
            Strategy::ParallelBatched => "parallel-batched",
        }
    }

    pub fn is_parallel(self) -> bool {
        matches!(self, Strategy::Parallel | Strategy::ParallelBatched)
    }

    /// Mean loss per simulated year.
    ///
    /// `source` is the run's generator. Parallel variants leave it untouched
    /// and draw from per-worker forks instead.
    pub fn execute(
        self,
        request: &SimulationRequest,
        source: &mut VariateSource,
        workers: &Workers,
    ) -> Result<f64> {
        let model = LossModel::from_request(request)?;
        let years = request.num_samples;

        let total = match self {
            Strategy::Sequential => sequential_total(&model, source, years),
            Strategy::Precounted => precounted_total(&model, source, years),
            Strategy::Batched => batched_total(&model, source, years),
            Strategy::Parallel => partitioned_total(&model, source, years, workers, sequential_total),
            Strategy::ParallelBatched => {
                partitioned_total(&model, source, years, workers, batched_total)
            }
        };

        Ok(total / years as f64)
    }
}

fn sequential_total(model: &LossModel, source: &mut VariateSource, years: usize) -> f64 {
    let mut total = 0.0;
    for _ in 0..years {
        total += model.simulate_year(source);
    }
    total
}

fn precounted_total(model: &LossModel, source: &mut VariateSource, years: usize) -> f64 {
    let florida_counts = model.florida.draw_event_counts(source, years);
    let gulf_counts = model.gulf.draw_event_counts(source, years);

    let mut total = 0.0;
    for (&fl, &gu) in florida_counts.iter().zip(&gulf_counts) {
        let florida = model.florida.loss_for_events(source, fl);
        let gulf = model.gulf.loss_for_events(source, gu);
        total += florida + gulf;
    }
    total
}

fn batched_total(model: &LossModel, source: &mut VariateSource, years: usize) -> f64 {
    let florida = model.florida.batched_total(source, years);
    let gulf = model.gulf.batched_total(source, years);
    florida + gulf
}

/// Split `years` into one contiguous share per worker, run `per_worker` on
/// each share with its own fork, and add the partial sums after the join.
///
/// Partials come back in worker order, so the final sum is deterministic for
/// a given (seed, worker count).
fn partitioned_total<F>(
    model: &LossModel,
    source: &VariateSource,
    years: usize,
    workers: &Workers,
    per_worker: F,
) -> f64
where
    F: Fn(&LossModel, &mut VariateSource, usize) -> f64 + Sync,
{
    let shares = partition(years, workers.count());
    debug!(workers = shares.len(), years, "partitioning simulated years");

    let forks: Vec<(VariateSource, usize)> = shares
        .into_iter()
        .enumerate()
        .map(|(w, share)| (source.fork(w), share))
        .collect();

    let partials: Vec<f64> = workers.install(|| {
        forks
            .into_par_iter()
            .map(|(mut fork, share)| per_worker(model, &mut fork, share))
            .collect()
    });

    partials.iter().sum()
}

/// Share sizes for `workers` workers; the first `years % workers` get one
/// extra year. Never more shares than years.
fn partition(years: usize, workers: usize) -> Vec<usize> {
    let n = workers.clamp(1, years.max(1));
    let base = years / n;
    let extra = years % n;
    (0..n).map(|w| base + usize::from(w < extra)).collect()
}

/// Worker pool for the parallel strategies: rayon's global pool, or a
/// dedicated pool when a cap is configured.
pub struct Workers {
    pool: Option<ThreadPool>,
}

impl Workers {
    pub fn global() -> Self {
        Workers { pool: None }
    }

    pub fn capped(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(SimulationError::not_positive("workers", 0.0));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("loss-worker-{i}"))
            .build()
            .map_err(|e| SimulationError::WorkerPool(e.to_string()))?;
        Ok(Workers { pool: Some(pool) })
    }

    pub fn count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl Default for Workers {
    fn default() -> Self {
        Self::global()
    }
}
