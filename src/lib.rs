//! Feedback Avalanche - relativistic feedback in a thundercloud
//!
//! Core modules:
//! - `sim`: Deterministic generation stepping (atmosphere, particles, generation stream)
//! - `random`: Shared, seedable random source
//! - `seed`: Seed photon input
//! - `settings`: Run configuration

pub mod error;
pub mod random;
pub mod seed;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use random::RandomSource;
pub use settings::Settings;
pub use sim::{Atmosphere, Generation, GenerationSequence, Particle, Photon, Termination};

use glam::DVec3;

/// Model defaults
pub mod consts {
    use glam::DVec3;

    /// Expected secondary photons per interacting photon
    pub const DEFAULT_MULTIPLICATION: f64 = 2.0;
    /// Mean photon free path
    pub const DEFAULT_PHOTON_FREE_PATH: f64 = 100.0;
    /// Acceleration cell length (offset of an offspring's birth point)
    pub const DEFAULT_CELL_LENGTH: f64 = 100.0;
    /// Cloud height; particles are tracked for 0 <= z <= cloud size
    pub const DEFAULT_CLOUD_SIZE: f64 = 1000.0;
    pub const DEFAULT_FIELD_MAGNITUDE: f64 = 0.2;
    /// Population above which a run stops as a runaway
    pub const DEFAULT_PARTICLE_LIMIT: usize = 10_000;

    /// Direction in which the field pushes electron packets (downward)
    pub const FIELD_AXIS: DVec3 = DVec3::NEG_Z;

    /// Energy of the default seed photon
    pub const DEFAULT_SEED_ENERGY: f64 = 1.0;
}

/// Average height of a set of particles, `None` when empty
#[inline]
pub fn mean_height(particles: &[Particle]) -> Option<f64> {
    if particles.is_empty() {
        return None;
    }
    Some(particles.iter().map(Particle::height).sum::<f64>() / particles.len() as f64)
}

/// Position on the vertical axis of the cloud at height `z`
#[inline]
pub fn on_axis(z: f64) -> DVec3 {
    DVec3::new(0.0, 0.0, z)
}
