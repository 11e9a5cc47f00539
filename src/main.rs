//! Feedback Avalanche runner
//!
//! Usage: `feedback-avalanche [SETTINGS.json] [OPTION=VALUE ...]`
//!
//! The settings file is read first; options then override its values.
//! Builds the run from settings, pulls generations until the avalanche dies
//! out or hits the particle limit, and logs one line per generation.
//! Log level comes from `RUST_LOG` (defaults to `info`).

use feedback_avalanche::{ConfigError, GenerationSequence, Settings, Termination};

fn settings_from_args(args: impl Iterator<Item = String>) -> Result<Settings, ConfigError> {
    let mut args = args.peekable();
    let mut settings = match args.next_if(|arg| !arg.contains('=')) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    for arg in args {
        match arg.split_once('=') {
            Some((option, value)) => settings.set(option, value)?,
            None => return Err(ConfigError::UnexpectedArgument(arg)),
        }
    }
    settings.validate()?;
    Ok(settings)
}

fn run(mut sequence: GenerationSequence) -> Option<Termination> {
    for generation in sequence.by_ref() {
        log::info!(
            "There are {} photons in generation {}. Average height is {:.2}",
            generation.len(),
            generation.index,
            generation.mean_height().unwrap_or(f64::NAN)
        );
    }
    sequence.termination()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match settings_from_args(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            if let ConfigError::UnknownOption(_) = err {
                log::error!("Known options: {}", Settings::OPTIONS.join(", "));
            }
            std::process::exit(1);
        }
    };

    let sequence = match settings.sequence() {
        Ok(sequence) => sequence,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    log::info!(
        "Feedback Avalanche starting: {:?}, particle limit {}",
        sequence.atmosphere(),
        sequence.particle_limit()
    );

    match run(sequence) {
        Some(Termination::Extinction) => log::info!("Avalanche died out"),
        Some(Termination::Overflow { population, limit }) => {
            log::warn!("Particle limit reached: {} > {}", population, limit)
        }
        None => {}
    }
}
