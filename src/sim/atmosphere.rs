//! Planar thundercloud and the feedback stepping rule
//!
//! A photon flies an exponential free path, interacts, and seeds a runaway
//! electron packet that accelerates over one cell length before radiating
//! the next photons. Everything happens inside the slab `0 <= z <= cloud_size`.

use glam::DVec3;

use super::particle::{Particle, Photon};
use crate::consts::*;
use crate::error::ConfigError;
use crate::random::RandomSource;

/// Fixed physical parameters of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Atmosphere {
    multiplication: f64,
    photon_free_path: f64,
    cell_length: f64,
    cloud_size: f64,
    field_magnitude: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            multiplication: DEFAULT_MULTIPLICATION,
            photon_free_path: DEFAULT_PHOTON_FREE_PATH,
            cell_length: DEFAULT_CELL_LENGTH,
            cloud_size: DEFAULT_CLOUD_SIZE,
            field_magnitude: DEFAULT_FIELD_MAGNITUDE,
        }
    }
}

impl Atmosphere {
    /// Validate and build an atmosphere
    ///
    /// Free path and cloud size must be positive; gain, cell length and field
    /// magnitude may be zero. Every value must be finite.
    pub fn new(
        multiplication: f64,
        photon_free_path: f64,
        cell_length: f64,
        cloud_size: f64,
        field_magnitude: f64,
    ) -> Result<Self, ConfigError> {
        check("gain", multiplication, false)?;
        check("free-path", photon_free_path, true)?;
        check("cell-length", cell_length, false)?;
        check("cloud-size", cloud_size, true)?;
        check("field-magnitude", field_magnitude, false)?;

        Ok(Self {
            multiplication,
            photon_free_path,
            cell_length,
            cloud_size,
            field_magnitude,
        })
    }

    pub fn multiplication(&self) -> f64 {
        self.multiplication
    }

    pub fn photon_free_path(&self) -> f64 {
        self.photon_free_path
    }

    pub fn cell_length(&self) -> f64 {
        self.cell_length
    }

    pub fn cloud_size(&self) -> f64 {
        self.cloud_size
    }

    pub fn field_magnitude(&self) -> f64 {
        self.field_magnitude
    }

    /// Whether a point lies in the cloud (both faces count as inside)
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        (0.0..=self.cloud_size).contains(&point.z)
    }

    /// Advance one generation
    ///
    /// Per parent, in order: one free-path draw, then (if the interaction
    /// point is inside the cloud) at most one draw for the offspring count.
    /// All offspring of a parent share one birth point; if it lies outside
    /// the cloud they are dropped right away. An empty population makes no
    /// draws.
    pub fn step(&self, particles: &[Particle], rng: &RandomSource) -> Vec<Particle> {
        if particles.is_empty() {
            return Vec::new();
        }

        let mut next = Vec::with_capacity(particles.len());
        let mut absorbed = 0usize;
        let mut stillborn = 0usize;

        for particle in particles {
            match particle {
                Particle::Photon(photon) => {
                    let Some(interaction) = self.propagate(photon, rng) else {
                        absorbed += 1;
                        continue;
                    };

                    let count = rng.next_count(self.multiplication);
                    match self.feedback(photon, interaction) {
                        Some(offspring) => {
                            next.extend(std::iter::repeat_n(Particle::Photon(offspring), count))
                        }
                        None => stillborn = stillborn.saturating_add(count),
                    }
                }
            }
        }

        log::trace!(
            "step: {} in, {} escaped, {} born outside, {} out",
            particles.len(),
            absorbed,
            stillborn,
            next.len()
        );

        next
    }

    /// Fly a photon to its interaction point, or `None` if it leaves the cloud
    fn propagate(&self, photon: &Photon, rng: &RandomSource) -> Option<DVec3> {
        let distance = rng.next_exponential(self.photon_free_path);
        let interaction = photon.origin() + distance * photon.direction();
        self.contains(interaction).then_some(interaction)
    }

    /// Secondary photon radiated by the electron packet started at `interaction`
    ///
    /// The packet runs one cell along the parent direction, drifting along the
    /// field; the new photon leaves along the field axis, tilted towards the
    /// parent direction by the field magnitude. `None` if born outside the cloud.
    fn feedback(&self, parent: &Photon, interaction: DVec3) -> Option<Photon> {
        let origin = interaction
            + self.cell_length * parent.direction()
            + self.cell_length * self.field_magnitude * FIELD_AXIS;
        if !self.contains(origin) {
            return None;
        }

        let direction = (FIELD_AXIS + self.field_magnitude * parent.direction())
            .try_normalize()
            .unwrap_or(FIELD_AXIS);
        Photon::new(origin, direction, parent.energy())
    }
}

fn check(option: &str, value: f64, strictly_positive: bool) -> Result<(), ConfigError> {
    let reason = if !value.is_finite() {
        Some("must be finite")
    } else if strictly_positive && value <= 0.0 {
        Some("must be positive")
    } else if value < 0.0 {
        Some("must not be negative")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::OutOfRange {
            option: option.to_string(),
            value,
            reason,
        }),
        None => Ok(()),
    }
}
