use rand::SeedableRng;
use rand::rngs::StdRng;
use sigdet_core::{ExperimentError, TrialKind};
use sigdet_experiment::{ExperimentConfig, TrialListBuilder};

#[test]
fn practice_trials_are_always_present() {
    let config = ExperimentConfig::default();
    let trials = TrialListBuilder::new(&config).practice().unwrap();
    assert_eq!(trials.len(), 5);
    assert!(trials.iter().all(|t| t.present));
    assert!(trials.iter().all(|t| t.kind == TrialKind::Practice));
    assert!(
        trials
            .iter()
            .all(|t| t.parameters.noise_amplitude == config.practice_noise_amplitude)
    );
}

#[test]
fn main_trials_balance_exactly() {
    let config = ExperimentConfig::default();
    let trials = TrialListBuilder::new(&config)
        .main(&mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(trials.len(), 20);
    assert_eq!(trials.iter().filter(|t| t.present).count(), 10);
    assert_eq!(trials.iter().filter(|t| !t.present).count(), 10);
    assert!(trials.iter().all(|t| t.kind == TrialKind::Main));
}

#[test]
fn odd_main_count_fails_with_invalid_parameter() {
    let config = ExperimentConfig {
        main_trials: 21,
        ..Default::default()
    };
    let result = TrialListBuilder::new(&config).main(&mut StdRng::seed_from_u64(1));
    assert!(matches!(
        result,
        Err(ExperimentError::InvalidParameter { what: "main_trials", .. })
    ));
}

#[test]
fn shuffle_shows_no_positional_bias() {
    let config = ExperimentConfig::default();
    let builder = TrialListBuilder::new(&config);
    let runs = 400;

    // With 10/20 present, each position should see a present trial about
    // half the time. Tally the first and last positions over many seeds.
    let mut first_present = 0;
    let mut last_present = 0;
    let mut orders = std::collections::HashSet::new();
    for seed in 0..runs {
        let trials = builder.main(&mut StdRng::seed_from_u64(seed)).unwrap();
        let order: Vec<bool> = trials.iter().map(|t| t.present).collect();
        first_present += order[0] as usize;
        last_present += order[19] as usize;
        orders.insert(order);
    }

    // ~6 sigma around the binomial mean of 200.
    let lo = 140;
    let hi = 260;
    assert!(
        (lo..=hi).contains(&first_present),
        "first position present {first_present}/{runs}"
    );
    assert!(
        (lo..=hi).contains(&last_present),
        "last position present {last_present}/{runs}"
    );
    // The order is not fixed across calls.
    assert!(orders.len() > runs as usize / 2, "only {} distinct orders", orders.len());
}
