//! Generations and the lazy generation stream
//!
//! `GenerationSequence` is a pull-based iterator: nothing is stepped until
//! the consumer asks for the next generation. Abandoning it mid-run is fine,
//! it only owns the current particle list and a handle to the random source.
//! A yielded generation shares its particle list with the sequence, which
//! steps from it on the next pull.

use std::sync::Arc;

use super::atmosphere::Atmosphere;
use super::particle::Particle;
use crate::random::RandomSource;

/// Snapshot of the live population at one step
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// 0 for the seed population, +1 per step
    pub index: usize,
    pub particles: Arc<[Particle]>,
}

impl Generation {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Average particle height, `None` for an empty population
    pub fn mean_height(&self) -> Option<f64> {
        crate::mean_height(&self.particles)
    }
}

/// Why a generation stream stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The population died out
    Extinction,
    /// The population grew past the particle limit
    Overflow { population: usize, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceState {
    Running,
    Terminated(Termination),
}

/// Lazily produced stream of generations
///
/// Each call to `next` performs at most one atmosphere step. The last
/// generation yielded is the one that triggered termination (empty on
/// extinction, over the limit on overflow). An overflowing generation is
/// fully built before the limit is checked and is yielded whole.
#[derive(Debug)]
pub struct GenerationSequence {
    atmosphere: Atmosphere,
    rng: Arc<RandomSource>,
    particle_limit: usize,
    state: SequenceState,
    /// Generation 0, until it has been handed out
    seed: Option<Arc<[Particle]>>,
    /// Most recently yielded generation, the input of the next step
    last: Option<Generation>,
}

impl GenerationSequence {
    /// Start a run from `seed` as generation 0
    ///
    /// Seed particles outside the cloud are dropped, the same as particles
    /// leaving it during a step.
    pub fn new(
        atmosphere: Atmosphere,
        rng: Arc<RandomSource>,
        mut seed: Vec<Particle>,
        particle_limit: usize,
    ) -> Self {
        let supplied = seed.len();
        seed.retain(|p| atmosphere.contains(p.origin()));
        if seed.len() < supplied {
            log::warn!(
                "Dropped {} seed particles outside the cloud",
                supplied - seed.len()
            );
        }

        Self {
            atmosphere,
            rng,
            particle_limit,
            state: SequenceState::Running,
            seed: Some(seed.into()),
            last: None,
        }
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub fn particle_limit(&self) -> usize {
        self.particle_limit
    }

    /// Termination reason, once the final generation has been yielded
    pub fn termination(&self) -> Option<Termination> {
        match self.state {
            SequenceState::Running => None,
            SequenceState::Terminated(reason) => Some(reason),
        }
    }

    fn check(&self, generation: &Generation) -> Option<Termination> {
        if generation.is_empty() {
            Some(Termination::Extinction)
        } else if generation.len() > self.particle_limit {
            Some(Termination::Overflow {
                population: generation.len(),
                limit: self.particle_limit,
            })
        } else {
            None
        }
    }
}

impl Iterator for GenerationSequence {
    type Item = Generation;

    fn next(&mut self) -> Option<Generation> {
        if let SequenceState::Terminated(_) = self.state {
            return None;
        }

        let candidate = match (self.seed.take(), self.last.take()) {
            (Some(seed), _) => Generation {
                index: 0,
                particles: seed,
            },
            (None, Some(previous)) => Generation {
                index: previous.index + 1,
                particles: self.atmosphere.step(&previous.particles, &self.rng).into(),
            },
            (None, None) => return None,
        };

        if let Some(reason) = self.check(&candidate) {
            log::debug!("Generation {} ends the run: {:?}", candidate.index, reason);
            self.state = SequenceState::Terminated(reason);
            return Some(candidate);
        }

        self.last = Some(Generation {
            index: candidate.index,
            particles: Arc::clone(&candidate.particles),
        });
        Some(candidate)
    }
}

impl std::iter::FusedIterator for GenerationSequence {}
