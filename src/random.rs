//! Shared random source
//!
//! One seeded generator feeds every stochastic decision of a run. The
//! generator sits behind a mutex so the source can be shared (`Arc`) with
//! a consumer on another thread; each call performs exactly one atomic draw.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Thread-safe, seedable pseudo-random source
#[derive(Debug)]
pub struct RandomSource {
    seed: u64,
    rng: Mutex<Pcg32>,
}

impl RandomSource {
    /// Reproducible source: the same seed yields the same sequence of draws
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(Pcg32::seed_from_u64(seed)),
        }
    }

    /// Source seeded from system entropy
    ///
    /// The chosen seed is kept so a run can still be replayed afterwards.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::debug!("Random source seeded from entropy: {}", seed);
        Self::seeded(seed)
    }

    /// Seed this source was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform deviate in [0, 1)
    pub fn next_uniform(&self) -> f64 {
        self.lock().random::<f64>()
    }

    /// Exponential deviate with the given mean (inverse transform)
    pub fn next_exponential(&self, mean: f64) -> f64 {
        let u = self.next_uniform();
        -mean * (1.0 - u).ln()
    }

    /// Non-negative integer whose expectation is exactly `mean`
    ///
    /// Drawn as `floor(mean)` plus one extra with probability `frac(mean)`.
    /// An integral mean consumes no draw and always returns itself.
    pub fn next_count(&self, mean: f64) -> usize {
        let whole = mean.floor();
        let frac = mean - whole;
        let extra = if frac > 0.0 && self.next_uniform() < frac {
            1
        } else {
            0
        };
        whole as usize + extra
    }

    fn lock(&self) -> MutexGuard<'_, Pcg32> {
        // A draw never leaves the generator half-updated, so a poisoned lock is still usable
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
