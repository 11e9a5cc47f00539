//! Seed photons for generation 0
//!
//! Text format, one record per line, whitespace separated:
//!
//! ```text
//! POS_X POS_Y POS_Z DIR_X DIR_Y DIR_Z ENERGY [COUNT]
//! ```
//!
//! `COUNT` defaults to 1 and expands to that many identical photons.
//! Directions need not be normalized. Blank lines are ignored.

use std::path::Path;

use glam::DVec3;

use crate::consts::DEFAULT_SEED_ENERGY;
use crate::error::ConfigError;
use crate::on_axis;
use crate::sim::{Particle, Photon};

const FIELD_NAMES: [&str; 7] = [
    "POS_X", "POS_Y", "POS_Z", "DIR_X", "DIR_Y", "DIR_Z", "ENERGY",
];

/// One photon halfway up the cloud, heading straight down
pub fn default_seed(cloud_size: f64) -> Vec<Particle> {
    Photon::new(on_axis(cloud_size / 2.0), DVec3::NEG_Z, DEFAULT_SEED_ENERGY)
        .into_iter()
        .map(Particle::Photon)
        .collect()
}

/// Parse seed photons from text
pub fn parse_seed_photons(text: &str) -> Result<Vec<Particle>, ConfigError> {
    let mut particles = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < FIELD_NAMES.len() {
            return Err(ConfigError::MalformedSeedLine {
                line,
                found: fields.len(),
            });
        }

        let mut values = [0.0f64; 7];
        for (slot, (name, field)) in values.iter_mut().zip(FIELD_NAMES.iter().zip(&fields)) {
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ConfigError::InvalidSeedField {
                    line,
                    field: *name,
                    value: field.to_string(),
                })?;
        }

        let energy = values[6];
        if !(energy > 0.0 && energy.is_finite()) {
            return Err(ConfigError::InvalidSeedField {
                line,
                field: "ENERGY",
                value: fields[6].to_string(),
            });
        }

        let count = match fields.get(7) {
            Some(field) => field.parse::<usize>().map_err(|_| ConfigError::InvalidSeedField {
                line,
                field: "COUNT",
                value: field.to_string(),
            })?,
            None => 1,
        };

        let position = DVec3::new(values[0], values[1], values[2]);
        let direction = DVec3::new(values[3], values[4], values[5]);
        let photon = Photon::new(position, direction, energy)
            .ok_or(ConfigError::DegenerateDirection { line })?;

        particles.extend(std::iter::repeat_n(Particle::Photon(photon), count));
    }

    log::debug!("Parsed {} seed photons", particles.len());
    Ok(particles)
}

/// Read and parse a seed photon file
pub fn read_seed_file(path: impl AsRef<Path>) -> Result<Vec<Particle>, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed_photons(&text)
}
