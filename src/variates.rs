use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal, Poisson};

/// Seeded source of event counts and severities for one run.
///
/// Each simulation run owns exactly one of these; parallel workers receive
/// their own via [`VariateSource::fork`]. There is no shared or global
/// generator anywhere in the crate.
pub struct VariateSource {
    seed: u64,
    rng: ChaCha20Rng,
}

impl VariateSource {
    pub fn seeded(seed: u64) -> Self {
        VariateSource { seed, rng: ChaCha20Rng::seed_from_u64(seed) }
    }

    /// Seed from OS entropy. The drawn seed is kept so worker forks stay
    /// derivable from it.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// `Some(seed)` → deterministic, `None` → entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Independent source for parallel worker `worker_index`.
    ///
    /// Same key as the parent, ChaCha stream `worker_index + 1` (stream 0 is the
    /// parent's), so a (seed, worker count) pair always reproduces and no two
    /// workers share a stream.
    pub fn fork(&self, worker_index: usize) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(worker_index as u64 + 1);
        VariateSource { seed: self.seed, rng }
    }

    /// Number of landfalls in one year.
    pub fn draw_event_count(&mut self, frequency: &Poisson<f64>) -> u64 {
        frequency.sample(&mut self.rng) as u64
    }

    /// Loss from a single landfall.
    pub fn draw_severity(&mut self, severity: &LogNormal<f64>) -> f64 {
        severity.sample(&mut self.rng)
    }

    /// `n` yearly counts in one batch.
    pub fn draw_event_counts(&mut self, frequency: &Poisson<f64>, n: usize) -> Vec<u64> {
        frequency
            .sample_iter(&mut self.rng)
            .take(n)
            .map(|c| c as u64)
            .collect()
    }

    /// Overwrite every slot of `out` with a fresh severity.
    pub fn fill_severities(&mut self, severity: &LogNormal<f64>, out: &mut [f64]) {
        for slot in out.iter_mut() {
            *slot = severity.sample(&mut self.rng);
        }
    }
}
