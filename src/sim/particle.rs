//! Particles carried through the cascade
//!
//! `Particle` is a closed set of variants: the stepping rule matches on it
//! exhaustively, so adding a variant (runaway electrons, say) is a
//! compile-checked change to the atmosphere as well.

use glam::DVec3;
use serde::Serialize;

/// A gamma photon
///
/// Only built through [`Photon::new`], so the direction is always a unit vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Photon {
    origin: DVec3,
    direction: DVec3,
    /// Energy in model units (positive)
    energy: f64,
}

impl Photon {
    /// Build a photon, normalizing `direction`
    ///
    /// Returns `None` when the direction has zero (or non-finite) length.
    pub fn new(origin: DVec3, direction: DVec3, energy: f64) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            origin,
            direction,
            energy,
        })
    }

    /// Current position
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Unit propagation direction
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }
}

/// Any particle that can live in a generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Particle {
    Photon(Photon),
}

impl Particle {
    /// Current position
    pub fn origin(&self) -> DVec3 {
        match self {
            Particle::Photon(photon) => photon.origin(),
        }
    }

    pub fn direction(&self) -> DVec3 {
        match self {
            Particle::Photon(photon) => photon.direction(),
        }
    }

    pub fn energy(&self) -> f64 {
        match self {
            Particle::Photon(photon) => photon.energy(),
        }
    }

    /// Height above ground (z coordinate)
    #[inline]
    pub fn height(&self) -> f64 {
        self.origin().z
    }
}

impl From<Photon> for Particle {
    fn from(photon: Photon) -> Self {
        Particle::Photon(photon)
    }
}
