use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

pub const DEFAULT_TIMING_CYCLES: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Raw, unvalidated inputs as a caller supplies them.
///
/// Means are arithmetic-space (the expected loss per landfall); stddevs are the
/// sigma of the underlying normal. Integers are signed so that a negative value
/// reaches validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossInputs {
    pub florida_landfall_rate: f64,
    pub florida_mean: f64,
    pub florida_stddev: f64,
    pub gulf_landfall_rate: f64,
    pub gulf_mean: f64,
    pub gulf_stddev: f64,
    pub num_monte_carlo_samples: i64,
    #[serde(default)]
    pub strategy_id: i64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl LossInputs {
    /// Reference scenario used by the cross-strategy checks.
    pub fn canonical() -> Self {
        LossInputs {
            florida_landfall_rate: 10.0,
            florida_mean: 2.0,
            florida_stddev: 0.6,
            gulf_landfall_rate: 20.0,
            gulf_mean: 0.3,
            gulf_stddev: 0.1,
            num_monte_carlo_samples: 20_000,
            strategy_id: 0,
            rng_seed: Some(123_456_789),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| SimulationError::Config(format!("{}: {e}", path.display())))
    }

    /// Values echoed into a timing record, in CLI order.
    pub fn timing_fields(&self) -> [f64; 7] {
        [
            self.florida_landfall_rate,
            self.florida_mean,
            self.florida_stddev,
            self.gulf_landfall_rate,
            self.gulf_mean,
            self.gulf_stddev,
            self.num_monte_carlo_samples as f64,
        ]
    }
}

/// Benchmark toggle, read from the environment.
///
/// - `TIMEIT`: enables timing unless unset, empty, `0` or `false`.
/// - `TIMEIT_CYCLES`: timed cycles (default 100, must be ≥ 1).
/// - `TIMEIT_LOGFILE`: append the timing record here instead of stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    pub enabled: bool,
    pub cycles: NonZeroUsize,
    pub record_path: Option<PathBuf>,
}

impl TimingConfig {
    pub fn disabled() -> Self {
        TimingConfig {
            enabled: false,
            cycles: DEFAULT_TIMING_CYCLES,
            record_path: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::disabled();

        config.enabled = lookup("TIMEIT")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "" | "0" | "false"))
            .unwrap_or(false);

        if let Some(raw) = lookup("TIMEIT_CYCLES") {
            config.cycles = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|e| SimulationError::Config(format!("TIMEIT_CYCLES={raw:?}: {e}")))?;
        }

        config.record_path = lookup("TIMEIT_LOGFILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn timing_off_by_default() {
        let cfg = TimingConfig::from_lookup(vars(&[])).unwrap();
        assert!(!cfg.enabled);
        assert_eq!(cfg.cycles, DEFAULT_TIMING_CYCLES);
        assert_eq!(cfg.cycles.get(), 100);
        assert_eq!(cfg.record_path, None);
    }

    #[test]
    fn timing_toggle_values() {
        for (v, on) in [("1", true), ("yes", true), ("0", false), ("False", false), ("", false)] {
            let cfg = TimingConfig::from_lookup(vars(&[("TIMEIT", v)])).unwrap();
            assert_eq!(cfg.enabled, on, "TIMEIT={v:?}");
        }
    }

    #[test]
    fn cycle_override_and_logfile() {
        let cfg = TimingConfig::from_lookup(vars(&[
            ("TIMEIT", "1"),
            ("TIMEIT_CYCLES", "7"),
            ("TIMEIT_LOGFILE", "timings.log"),
        ]))
        .unwrap();
        assert_eq!(cfg.cycles.get(), 7);
        assert_eq!(cfg.record_path, Some(PathBuf::from("timings.log")));
    }

    #[test]
    fn malformed_cycles_rejected() {
        for bad in ["0", "-3", "many"] {
            let err = TimingConfig::from_lookup(vars(&[("TIMEIT_CYCLES", bad)])).unwrap_err();
            assert!(matches!(err, SimulationError::Config(_)), "TIMEIT_CYCLES={bad:?}");
        }
    }

    #[test]
    fn inputs_deserialize_with_defaults() {
        let json = r#"{
            "florida_landfall_rate": 10.0, "florida_mean": 2.0, "florida_stddev": 0.6,
            "gulf_landfall_rate": 20.0, "gulf_mean": 0.3, "gulf_stddev": 0.1,
            "num_monte_carlo_samples": 1000
        }"#;
        let inputs: LossInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.strategy_id, 0);
        assert_eq!(inputs.rng_seed, None);
        assert_eq!(inputs.num_monte_carlo_samples, 1000);
    }

    #[test]
    fn timing_fields_follow_cli_order() {
        let f = LossInputs::canonical().timing_fields();
        assert_eq!(f, [10.0, 2.0, 0.6, 20.0, 0.3, 0.1, 20_000.0]);
    }
}
