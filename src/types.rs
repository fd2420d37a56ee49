use serde::Serialize;

/// The two modelled landfall regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Region {
    Florida,
    Gulf,
}

/// Distribution parameters for one region, already in model space.
///
/// `severity_log_mean` is ln of the user-facing arithmetic mean. The transform
/// happens once, in validation; nothing downstream re-applies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionParameters {
    /// Poisson λ: expected landfalls per year.
    pub landfall_rate: f64,
    pub severity_log_mean: f64,
    pub severity_log_stddev: f64,
}

impl RegionParameters {
    /// Expected annual loss, λ·exp(μ + σ²/2).
    pub fn expected_annual_loss(&self) -> f64 {
        let sigma = self.severity_log_stddev;
        self.landfall_rate * (self.severity_log_mean + sigma * sigma / 2.0).exp()
    }
}

/// One fully validated simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub florida: RegionParameters,
    pub gulf: RegionParameters,
    pub num_samples: usize,
    /// `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl SimulationRequest {
    /// Analytic mean annual loss across both regions.
    pub fn expected_annual_loss(&self) -> f64 {
        self.florida.expected_annual_loss() + self.gulf.expected_annual_loss()
    }
}
