//! Deterministic cascade simulation
//!
//! Everything numerically interesting lives here. Given the same seed,
//! particles and parameters, a run replays exactly:
//! - Seeded random source only
//! - Stable particle order (parents in order, offspring in birth order)
//! - No I/O; consumers log and plot the generation stream

pub mod atmosphere;
pub mod generation;
pub mod particle;

pub use atmosphere::Atmosphere;
pub use generation::{Generation, GenerationSequence, Termination};
pub use particle::{Particle, Photon};
