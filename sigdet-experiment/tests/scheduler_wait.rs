use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sigdet_audio::NullSink;
use sigdet_core::{TrialKind, TrialSpec};
use sigdet_experiment::{ExperimentConfig, ScheduleResult, TrialScheduler};
use sigdet_timing::{Clock, VirtualClock};

fn spec(config: &ExperimentConfig) -> TrialSpec {
    TrialSpec {
        kind: TrialKind::Main,
        present: true,
        parameters: config.main_parameters(true).unwrap(),
    }
}

#[test]
fn run_trial_suspends_for_duration_plus_settle_margin() {
    let config = ExperimentConfig::default();
    let clock = VirtualClock::new();
    let mut scheduler = TrialScheduler::new(
        clock.clone(),
        NullSink::new(),
        config.sample_rate_hz,
        config.settle_margin_s,
    );

    let before = clock.now();
    let result = scheduler
        .run_trial(0, &spec(&config), &mut StdRng::seed_from_u64(1))
        .unwrap();

    let expected = Duration::from_secs_f64(config.trial_duration_s + config.settle_margin_s);
    assert!(clock.elapsed(before) >= expected, "returned before the stimulus ended");
    match result {
        ScheduleResult::Completed(timing) => {
            assert!(timing.reliable);
            assert_eq!(timing.expected, expected);
        }
        ScheduleResult::Aborted => panic!("trial should have completed"),
    }
}

#[test]
fn cancelled_trial_reports_aborted() {
    let config = ExperimentConfig::default();
    let clock = VirtualClock::new();
    let mut scheduler = TrialScheduler::new(
        clock.clone(),
        NullSink::new(),
        config.sample_rate_hz,
        config.settle_margin_s,
    );
    scheduler.cancel_handle().store(true, Ordering::Relaxed);

    let result = scheduler
        .run_trial(0, &spec(&config), &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert!(matches!(result, ScheduleResult::Aborted));
    // Cancellation never advances the virtual clock: playback stopped at once.
    assert_eq!(clock.now(), 0);
}

/// Clock whose wait comes back early, as if the process had been suspended.
#[derive(Clone)]
struct SuspendedClock {
    inner: VirtualClock,
}

impl Clock for SuspendedClock {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.inner.now()
    }
    fn elapsed(&self, since: u64) -> Duration {
        self.inner.elapsed(since)
    }
    fn wait(&self, duration: Duration, _cancel: &AtomicBool) -> bool {
        self.inner.advance(duration / 2);
        true
    }
}

#[test]
fn short_wait_flags_the_trial_unreliable_instead_of_failing() {
    let config = ExperimentConfig::default();
    let clock = SuspendedClock {
        inner: VirtualClock::new(),
    };
    let mut scheduler = TrialScheduler::new(
        clock,
        NullSink::new(),
        config.sample_rate_hz,
        config.settle_margin_s,
    );

    let result = scheduler
        .run_trial(0, &spec(&config), &mut StdRng::seed_from_u64(1))
        .unwrap();
    match result {
        ScheduleResult::Completed(timing) => assert!(!timing.reliable),
        ScheduleResult::Aborted => panic!("trial should have completed"),
    }
}

#[test]
fn synthesis_failure_is_fatal_to_the_trial() {
    let config = ExperimentConfig::default();
    let mut bad = spec(&config);
    bad.parameters.high_cut_hz = bad.parameters.low_cut_hz; // inverted band
    let mut scheduler = TrialScheduler::new(
        VirtualClock::new(),
        NullSink::new(),
        config.sample_rate_hz,
        config.settle_margin_s,
    );
    assert!(
        scheduler
            .run_trial(0, &bad, &mut StdRng::seed_from_u64(1))
            .is_err()
    );
}
