use crate::config::LossInputs;
use crate::error::{Result, SimulationError};
use crate::region::{MAX_LANDFALL_RATE, MAX_LANDFALL_RATE_BOUND};
use crate::registry::{self, StrategyDescriptor};
use crate::types::{RegionParameters, SimulationRequest};

/// A request that passed every check, with its resolved strategy.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedRun {
    pub descriptor: &'static StrategyDescriptor,
    pub request: SimulationRequest,
}

/// Check raw inputs and build the model-space request.
///
/// Fields are checked in input order and the first failure is returned. This is
/// the only place the arithmetic-space means are moved into log space.
pub fn validate(inputs: &LossInputs) -> Result<ValidatedRun> {
    let florida = region(
        ("florida_landfall_rate", inputs.florida_landfall_rate),
        ("florida_mean", inputs.florida_mean),
        ("florida_stddev", inputs.florida_stddev),
    )?;
    let gulf = region(
        ("gulf_landfall_rate", inputs.gulf_landfall_rate),
        ("gulf_mean", inputs.gulf_mean),
        ("gulf_stddev", inputs.gulf_stddev),
    )?;

    let num_samples = num_samples(inputs.num_monte_carlo_samples)?;
    let descriptor = registry::lookup(inputs.strategy_id)?;

    Ok(ValidatedRun {
        descriptor,
        request: SimulationRequest { florida, gulf, num_samples, rng_seed: inputs.rng_seed },
    })
}

fn region(
    rate: (&'static str, f64),
    mean: (&'static str, f64),
    stddev: (&'static str, f64),
) -> Result<RegionParameters> {
    let landfall_rate = positive(rate)?;
    if landfall_rate > MAX_LANDFALL_RATE {
        return Err(SimulationError::InvalidParameter {
            field: rate.0,
            bound: MAX_LANDFALL_RATE_BOUND,
            value: landfall_rate,
        });
    }
    let mean = positive(mean)?;
    let severity_log_stddev = positive(stddev)?;
    Ok(RegionParameters { landfall_rate, severity_log_mean: mean.ln(), severity_log_stddev })
}

fn positive((field, value): (&'static str, f64)) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::not_positive(field, value))
    }
}

fn num_samples(raw: i64) -> Result<usize> {
    if raw <= 0 {
        return Err(SimulationError::not_positive("num_monte_carlo_samples", raw as f64));
    }
    usize::try_from(raw).map_err(|_| SimulationError::InvalidParameter {
        field: "num_monte_carlo_samples",
        bound: "<=usize::MAX",
        value: raw as f64,
    })
}
