use rand_distr::{LogNormal, Poisson, PoissonError};

use crate::error::{Result, SimulationError};
use crate::types::{Region, RegionParameters, SimulationRequest};
use crate::variates::VariateSource;

/// Severities are drawn into a reused buffer of at most this many slots, so a
/// batched run over millions of events never allocates proportionally.
const SEVERITY_BATCH: usize = 1 << 14;

/// Largest landfall rate the Poisson sampler accepts.
pub const MAX_LANDFALL_RATE: f64 = Poisson::<f64>::MAX_LAMBDA;
/// `MAX_LANDFALL_RATE` as an error bound.
pub const MAX_LANDFALL_RATE_BOUND: &str = "<=1.844e19";

/// Frequency/severity model for one region.
///
/// Each year runs an independent Poisson process: draw a landfall count from
/// Poisson(λ), then one LogNormal severity per landfall. Parameters arrive in
/// log space and are used as-is.
pub struct RegionModel {
    pub region: Region,
    pub params: RegionParameters,
    frequency: Poisson<f64>,
    severity: LogNormal<f64>,
}

impl RegionModel {
    pub fn new(region: Region, params: RegionParameters) -> Result<Self> {
        let frequency = Poisson::new(params.landfall_rate).map_err(|e| {
            let field = rate_field(region);
            match e {
                PoissonError::ShapeTooLarge => SimulationError::InvalidParameter {
                    field,
                    bound: MAX_LANDFALL_RATE_BOUND,
                    value: params.landfall_rate,
                },
                _ => SimulationError::not_positive(field, params.landfall_rate),
            }
        })?;
        let severity = LogNormal::new(params.severity_log_mean, params.severity_log_stddev)
            .map_err(|_| {
                SimulationError::not_positive(stddev_field(region), params.severity_log_stddev)
            })?;
        Ok(RegionModel { region, params, frequency, severity })
    }

    pub fn draw_event_count(&self, source: &mut VariateSource) -> u64 {
        source.draw_event_count(&self.frequency)
    }

    pub fn draw_event_counts(&self, source: &mut VariateSource, years: usize) -> Vec<u64> {
        source.draw_event_counts(&self.frequency, years)
    }

    /// Sum of `events` severities drawn one at a time.
    pub fn loss_for_events(&self, source: &mut VariateSource, events: u64) -> f64 {
        let mut loss = 0.0;
        for _ in 0..events {
            loss += source.draw_severity(&self.severity);
        }
        loss
    }

    /// One simulated year: count first, then each severity in order.
    pub fn simulate_year(&self, source: &mut VariateSource) -> f64 {
        let events = self.draw_event_count(source);
        self.loss_for_events(source, events)
    }

    /// Sum of `events` severities drawn in batches.
    pub fn batched_loss(&self, source: &mut VariateSource, events: u64) -> f64 {
        let cap = usize::try_from(events).unwrap_or(usize::MAX).min(SEVERITY_BATCH);
        let mut buf = vec![0.0; cap];
        let mut remaining = events;
        let mut total = 0.0;
        while remaining > 0 {
            let take = usize::try_from(remaining).unwrap_or(usize::MAX).min(cap);
            let chunk = &mut buf[..take];
            source.fill_severities(&self.severity, chunk);
            total += chunk.iter().sum::<f64>();
            remaining -= take as u64;
        }
        total
    }

    /// Total loss over `years` years: all counts in one batch, then all
    /// severities in batches.
    pub fn batched_total(&self, source: &mut VariateSource, years: usize) -> f64 {
        let events: u64 = self.draw_event_counts(source, years).iter().sum();
        self.batched_loss(source, events)
    }
}

/// Both regions of a request, ready to sample.
pub struct LossModel {
    pub florida: RegionModel,
    pub gulf: RegionModel,
}

impl LossModel {
    pub fn from_request(request: &SimulationRequest) -> Result<Self> {
        Ok(LossModel {
            florida: RegionModel::new(Region::Florida, request.florida)?,
            gulf: RegionModel::new(Region::Gulf, request.gulf)?,
        })
    }

    /// Florida count, Florida severities, Gulf count, Gulf severities.
    pub fn simulate_year(&self, source: &mut VariateSource) -> f64 {
        let florida = self.florida.simulate_year(source);
        let gulf = self.gulf.simulate_year(source);
        florida + gulf
    }
}

fn rate_field(region: Region) -> &'static str {
    match region {
        Region::Florida => "florida_landfall_rate",
        Region::Gulf => "gulf_landfall_rate",
    }
}

fn stddev_field(region: Region) -> &'static str {
    match region {
        Region::Florida => "florida_stddev",
        Region::Gulf => "gulf_stddev",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(rate: f64, mean: f64, stddev: f64) -> RegionParameters {
        RegionParameters {
            landfall_rate: rate,
            severity_log_mean: mean.ln(),
            severity_log_stddev: stddev,
        }
    }

    #[test]
    fn rejects_non_positive_rate_at_construction() {
        let err = RegionModel::new(Region::Gulf, params(0.0, 1.0, 0.1)).err().unwrap();
        assert_eq!(err.field(), Some("gulf_landfall_rate"));
    }

    #[test]
    fn oversized_rate_reports_upper_bound() {
        let err = RegionModel::new(Region::Florida, params(1e20, 1.0, 0.1)).err().unwrap();
        assert_eq!(err.field(), Some("florida_landfall_rate"));
        assert_eq!(err.to_string(), "Expect florida_landfall_rate<=1.844e19, got 100000000000000000000");
    }

    #[test]
    fn rate_bound_text_matches_sampler_limit() {
        assert_eq!(MAX_LANDFALL_RATE_BOUND, format!("<={MAX_LANDFALL_RATE:e}"));
        assert!(RegionModel::new(Region::Gulf, params(MAX_LANDFALL_RATE, 1.0, 0.1)).is_ok());
    }

    #[test]
    fn rejects_negative_stddev_at_construction() {
        let err = RegionModel::new(Region::Florida, params(1.0, 1.0, -0.1)).err().unwrap();
        assert_eq!(err.field(), Some("florida_stddev"));
    }

    #[test]
    fn zero_events_cost_nothing() {
        let model = RegionModel::new(Region::Florida, params(1.0, 2.0, 0.6)).unwrap();
        let mut src = VariateSource::seeded(5);
        assert_eq!(model.loss_for_events(&mut src, 0), 0.0);
        assert_eq!(model.batched_loss(&mut src, 0), 0.0);
    }

    /// Near-degenerate severity (σ≈0) makes each landfall cost exactly the
    /// arithmetic mean, so a year's loss is count × mean.
    #[test]
    fn degenerate_severity_scales_with_count() {
        let model = RegionModel::new(Region::Gulf, params(5.0, 3.0, 1e-14)).unwrap();
        let mut src = VariateSource::seeded(11);
        let loss = model.loss_for_events(&mut src, 4);
        approx::assert_relative_eq!(loss, 12.0, max_relative = 1e-9);
    }

    /// Batched totals cross the internal buffer boundary without losing events.
    #[test]
    fn batched_loss_spans_multiple_buffers() {
        let model = RegionModel::new(Region::Gulf, params(1.0, 0.5, 1e-14)).unwrap();
        let mut src = VariateSource::seeded(3);
        let events = SEVERITY_BATCH as u64 * 2 + 17;
        let loss = model.batched_loss(&mut src, events);
        approx::assert_relative_eq!(loss, events as f64 * 0.5, max_relative = 1e-9);
    }

    #[test]
    fn yearly_mean_tracks_expected_loss() {
        let p = params(10.0, 2.0, 0.6);
        let model = RegionModel::new(Region::Florida, p).unwrap();
        let mut src = VariateSource::seeded(123_456_789);
        let years = 20_000;
        let mean = (0..years).map(|_| model.simulate_year(&mut src)).sum::<f64>() / years as f64;
        let expected = p.expected_annual_loss();
        assert!(
            (mean - expected).abs() / expected < 0.01,
            "mean annual loss {mean:.4} vs expected {expected:.4}"
        );
    }

    #[test]
    fn batched_total_tracks_expected_loss() {
        let p = params(20.0, 0.3, 0.1);
        let model = RegionModel::new(Region::Gulf, p).unwrap();
        let mut src = VariateSource::seeded(123_456_789);
        let years = 20_000;
        let mean = model.batched_total(&mut src, years) / years as f64;
        let expected = p.expected_annual_loss();
        assert!(
            (mean - expected).abs() / expected < 0.01,
            "batched mean {mean:.4} vs expected {expected:.4}"
        );
    }
}
