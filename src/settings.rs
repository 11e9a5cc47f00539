//! Run settings
//!
//! Loaded from JSON (missing fields take their defaults) or set one option
//! at a time from strings. Nothing is built until every value validates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::random::RandomSource;
use crate::seed;
use crate::sim::{Atmosphere, GenerationSequence, Particle};

/// Everything needed to start a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Atmosphere ===
    /// Local coefficient of gamma multiplication
    pub multiplication: f64,
    /// Photon mean free path
    pub photon_free_path: f64,
    /// Length of the acceleration cell (offsets the birth point of new photons)
    pub cell_length: f64,
    pub cloud_size: f64,
    pub field_magnitude: f64,

    // === Run ===
    /// Upper limit on the number of particles in a generation
    pub particle_limit: usize,
    /// Random generator seed; `None` seeds from system entropy
    pub seed: Option<u64>,
    /// Seed photon file; `None` uses the default single photon
    pub seed_photons: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            multiplication: DEFAULT_MULTIPLICATION,
            photon_free_path: DEFAULT_PHOTON_FREE_PATH,
            cell_length: DEFAULT_CELL_LENGTH,
            cloud_size: DEFAULT_CLOUD_SIZE,
            field_magnitude: DEFAULT_FIELD_MAGNITUDE,
            particle_limit: DEFAULT_PARTICLE_LIMIT,
            seed: None,
            seed_photons: None,
        }
    }
}

impl Settings {
    /// Option names accepted by [`Settings::set`]
    pub const OPTIONS: [&'static str; 8] = [
        "gain",
        "free-path",
        "cell-length",
        "cloud-size",
        "field-magnitude",
        "particle-limit",
        "seed",
        "seed-photons",
    ];

    /// Set one option from its textual value
    pub fn set(&mut self, option: &str, value: &str) -> Result<(), ConfigError> {
        match option {
            "gain" => self.multiplication = parse_number(option, value)?,
            "free-path" => self.photon_free_path = parse_number(option, value)?,
            "cell-length" => self.cell_length = parse_number(option, value)?,
            "cloud-size" => self.cloud_size = parse_number(option, value)?,
            "field-magnitude" => self.field_magnitude = parse_number(option, value)?,
            "particle-limit" => self.particle_limit = parse_number(option, value)?,
            "seed" => self.seed = Some(parse_number(option, value)?),
            "seed-photons" => self.seed_photons = Some(PathBuf::from(value)),
            _ => return Err(ConfigError::UnknownOption(option.to_string())),
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every parameter without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.atmosphere().map(|_| ())
    }

    /// Build the atmosphere described by these settings
    pub fn atmosphere(&self) -> Result<Atmosphere, ConfigError> {
        Atmosphere::new(
            self.multiplication,
            self.photon_free_path,
            self.cell_length,
            self.cloud_size,
            self.field_magnitude,
        )
    }

    /// Seeded random source, or one seeded from entropy
    pub fn random_source(&self) -> RandomSource {
        match self.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        }
    }

    /// Generation 0: the seed file if given, otherwise the default photon
    ///
    /// Every seed photon must start inside the cloud.
    pub fn seed_particles(&self) -> Result<Vec<Particle>, ConfigError> {
        let particles = match &self.seed_photons {
            Some(path) => seed::read_seed_file(path)?,
            None => seed::default_seed(self.cloud_size),
        };
        let atmosphere = self.atmosphere()?;
        if let Some((i, outside)) = particles
            .iter()
            .enumerate()
            .find(|(_, p)| !atmosphere.contains(p.origin()))
        {
            return Err(ConfigError::SeedOutsideCloud {
                index: i + 1,
                height: outside.height(),
                cloud_size: self.cloud_size,
            });
        }
        Ok(particles)
    }

    /// Validate everything and start a run
    pub fn sequence(&self) -> Result<GenerationSequence, ConfigError> {
        let atmosphere = self.atmosphere()?;
        let particles = self.seed_particles()?;
        let rng = Arc::new(self.random_source());
        Ok(GenerationSequence::new(
            atmosphere,
            rng,
            particles,
            self.particle_limit,
        ))
    }
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        option: option.to_string(),
        value: value.to_string(),
    })
}
