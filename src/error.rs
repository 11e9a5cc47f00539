//! Configuration errors
//!
//! Everything that can go wrong before the first generation is produced.
//! Once a run starts, extinction and overflow are reported as
//! [`Termination`](crate::sim::Termination) values, never as errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option value is not a valid number
    #[error("option `{option}` can't be equal `{value}`: not a valid number")]
    InvalidNumber { option: String, value: String },

    /// An option value parsed, but is outside its allowed range
    #[error("option `{option}` can't be equal `{value}`: {reason}")]
    OutOfRange {
        option: String,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// A settings file anywhere but first on the command line
    #[error("unexpected argument `{0}`: a settings file must come before any OPTION=VALUE")]
    UnexpectedArgument(String),

    /// A seed-photon line has fewer than the 7 mandatory fields
    #[error("seed photons line {line}: expected at least 7 fields, found {found}")]
    MalformedSeedLine { line: usize, found: usize },

    #[error("seed photons line {line}: field {field} can't be equal `{value}`")]
    InvalidSeedField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("seed photons line {line}: direction has zero length")]
    DegenerateDirection { line: usize },

    /// A seed photon starts outside the cloud (or at a non-finite height)
    #[error("seed photon {index} at height {height} is outside the cloud [0, {cloud_size}]")]
    SeedOutsideCloud {
        index: usize,
        height: f64,
        cloud_size: f64,
    },

    #[error("can't read seed photons from {}: {source}", path.display())]
    SeedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't read settings from {}: {source}", path.display())]
    SettingsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_option_and_value() {
        let err = ConfigError::InvalidNumber {
            option: "gain".to_string(),
            value: "two".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gain"));
        assert!(msg.contains("two"));

        let err = ConfigError::MalformedSeedLine { line: 3, found: 5 };
        assert!(err.to_string().contains("line 3"));
    }
}
