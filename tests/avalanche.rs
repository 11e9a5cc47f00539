// Integration tests for whole runs: reproducibility, termination and seeding

use std::sync::Arc;

use feedback_avalanche::seed::{default_seed, parse_seed_photons};
use feedback_avalanche::{
    Atmosphere, Generation, GenerationSequence, RandomSource, Settings, Termination,
};

fn run_with_seed(settings: &Settings) -> (Vec<Generation>, Option<Termination>) {
    let mut sequence = settings.sequence().unwrap();
    let generations: Vec<Generation> = sequence.by_ref().take(1000).collect();
    (generations, sequence.termination())
}

#[test]
fn test_reproducibility_with_same_seed() {
    let mut settings = Settings::default();
    settings.seed = Some(42);
    settings.particle_limit = 5_000;

    let (first, end1) = run_with_seed(&settings);
    let (second, end2) = run_with_seed(&settings);

    assert_eq!(first.len(), second.len());
    assert_eq!(end1, end2);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.len(), b.len());
        for (p, q) in a.particles.iter().zip(b.particles.iter()) {
            assert!((p.origin() - q.origin()).length() < 1e-9);
        }
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut settings = Settings::default();
    settings.seed = Some(1);
    let (first, _) = run_with_seed(&settings);
    settings.seed = Some(2);
    let (second, _) = run_with_seed(&settings);

    let heights = |gens: &[Generation]| -> Vec<Option<f64>> {
        gens.iter().map(Generation::mean_height).collect()
    };
    assert_ne!(heights(&first), heights(&second));
}

#[test]
fn test_single_photon_scenario() {
    let mut settings = Settings::default();
    settings.multiplication = 1.0;
    settings.cloud_size = 1000.0;
    settings.photon_free_path = 100.0;
    settings.cell_length = 100.0;
    settings.field_magnitude = 0.0;
    settings.seed = Some(42);
    settings.particle_limit = 10_000;

    let mut sequence = settings.sequence().unwrap();
    let generations: Vec<Generation> = sequence.by_ref().collect();

    // Generation 0: the default photon, halfway up
    assert_eq!(generations[0].index, 0);
    assert_eq!(generations[0].len(), 1);
    assert_eq!(generations[0].particles[0].height(), 500.0);

    // Generation 1: still one photon, lower down
    assert_eq!(generations[1].index, 1);
    assert_eq!(generations[1].len(), 1);
    assert!(generations[1].particles[0].height() < 500.0);

    // Straight down with unit gain: one photon per generation, always falling, until it leaves
    for pair in generations.windows(2) {
        assert!(pair[1].len() <= 1);
        if let (Some(upper), Some(lower)) = (pair[0].mean_height(), pair[1].mean_height()) {
            assert!(lower < upper);
        }
    }
    assert!(generations.last().unwrap().is_empty());
    assert!(generations[..generations.len() - 1].iter().all(|g| g.len() == 1));
    assert_eq!(sequence.termination(), Some(Termination::Extinction));
    // Each step falls at least one cell length
    assert!(generations.len() <= 7);
}

#[test]
fn test_indices_are_monotonic() {
    let mut settings = Settings::default();
    settings.seed = Some(7);
    let (generations, _) = run_with_seed(&settings);
    for (i, generation) in generations.iter().enumerate() {
        assert_eq!(generation.index, i);
    }
}

#[test]
fn test_boundary_containment() {
    let atmosphere = Atmosphere::new(2.5, 150.0, 50.0, 600.0, 0.3).unwrap();
    for seed in 0..20 {
        let rng = Arc::new(RandomSource::seeded(seed));
        let sequence =
            GenerationSequence::new(atmosphere.clone(), rng, default_seed(600.0), 3_000);
        for generation in sequence {
            for particle in generation.particles.iter() {
                let z = particle.height();
                assert!((0.0..=600.0).contains(&z), "z = {} in generation {}", z, generation.index);
            }
        }
    }
}

#[test]
fn test_subcritical_runs_die_out() {
    let atmosphere = Atmosphere::new(0.8, 100.0, 100.0, 1e6, 0.2).unwrap();
    for seed in 0..50 {
        let rng = Arc::new(RandomSource::seeded(seed));
        let particles = vec![default_seed(1e6)[0]; 20];
        let mut sequence = GenerationSequence::new(atmosphere.clone(), rng, particles, 10_000);
        let count = sequence.by_ref().take(10_000).count();
        assert!(count < 10_000);
        assert_eq!(sequence.termination(), Some(Termination::Extinction));
    }
}

#[test]
fn test_supercritical_runs_overflow() {
    // Tall cloud, short steps: boundary losses are negligible
    let atmosphere = Atmosphere::new(2.0, 1.0, 1.0, 1e7, 0.2).unwrap();
    for seed in 0..10 {
        let rng = Arc::new(RandomSource::seeded(seed));
        let mut sequence =
            GenerationSequence::new(atmosphere.clone(), rng, default_seed(1e7), 10_000);
        let last = sequence.by_ref().last().unwrap();
        assert!(last.len() > 10_000);
        assert_eq!(
            sequence.termination(),
            Some(Termination::Overflow {
                population: last.len(),
                limit: 10_000
            })
        );
        // 2^14 > 10_000
        assert_eq!(last.index, 14);
    }
}

#[test]
fn test_growth_ratio_converges_to_gain() {
    let atmosphere = Atmosphere::new(1.5, 1.0, 1.0, 1e7, 0.2).unwrap();
    let mut parents = 0usize;
    let mut children = 0usize;
    for seed in 0..200 {
        let rng = Arc::new(RandomSource::seeded(seed));
        let generations: Vec<Generation> =
            GenerationSequence::new(atmosphere.clone(), rng, default_seed(1e7), 2_000).collect();
        for pair in generations.windows(2) {
            parents += pair[0].len();
            children += pair[1].len();
        }
    }
    let ratio = children as f64 / parents as f64;
    assert!((ratio - 1.5).abs() < 0.02, "ratio {}", ratio);
}

#[test]
fn test_seed_file_round_trip() {
    let text = "0 0 400 0 0 -1 1.0 3\n0 0 600 0.1 0 1 2.0 1\n";
    let particles = parse_seed_photons(text).unwrap();

    let rng = Arc::new(RandomSource::seeded(3));
    let mut sequence = GenerationSequence::new(Atmosphere::default(), rng, particles, 10_000);
    let first = sequence.next().unwrap();

    assert_eq!(first.index, 0);
    assert_eq!(first.len(), 4);
    assert_eq!(first.particles[0], first.particles[1]);
    assert_eq!(first.particles[1], first.particles[2]);
    assert_ne!(first.particles[2], first.particles[3]);
}

#[test]
fn test_generation_zero_stays_in_cloud() {
    assert!(parse_seed_photons("0 0 5000 0 0 -1 1.0\n0 0 nan 0 0 -1 1.0").is_err());

    let particles = parse_seed_photons("0 0 5000 0 0 -1 1.0\n0 0 250 0 0 -1 1.0 2\n").unwrap();
    let rng = Arc::new(RandomSource::seeded(3));
    let mut sequence = GenerationSequence::new(Atmosphere::default(), rng, particles, 10_000);
    let first = sequence.next().unwrap();

    assert_eq!(first.len(), 2);
    assert!(first.particles.iter().all(|p| p.height() == 250.0));
}

#[test]
fn test_seed_file_from_disk() {
    let path = std::env::temp_dir().join(format!("seed-photons-{}.txt", std::process::id()));
    std::fs::write(&path, "0 0 500 0 0 -1 1.0 2\n").unwrap();

    let mut settings = Settings::default();
    settings.seed = Some(5);
    settings.seed_photons = Some(path.clone());
    let mut sequence = settings.sequence().unwrap();
    assert_eq!(sequence.next().unwrap().len(), 2);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_random_source_shared_across_threads() {
    let rng = Arc::new(RandomSource::seeded(123));
    let atmosphere = Atmosphere::default();

    std::thread::scope(|scope| {
        let consumer = {
            let rng = rng.clone();
            scope.spawn(move || {
                (0..10_000)
                    .map(|_| rng.next_uniform())
                    .all(|u| (0.0..1.0).contains(&u))
            })
        };

        let sequence =
            GenerationSequence::new(atmosphere, rng.clone(), default_seed(1000.0), 10_000);
        for generation in sequence {
            assert!(generation.particles.iter().all(|p| (0.0..=1000.0).contains(&p.height())));
        }

        assert!(consumer.join().unwrap());
    });
}
