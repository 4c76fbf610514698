use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use sigdet_audio::AudioSink;
use sigdet_core::{ExperimentError, TrialSpec};
use sigdet_timing::Clock;
use tracing::warn;

/// Slack allowed before a wait counts as a timing violation. Covers clock
/// quantization, not scheduler stalls.
const TIMING_TOLERANCE: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
pub struct TrialTiming {
    pub expected: Duration,
    pub elapsed: Duration,
    /// False when the wall-clock wait came back short (process suspended,
    /// clock trouble). The trial still counts; analyses can exclude it.
    pub reliable: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ScheduleResult {
    Completed(TrialTiming),
    /// The run was cancelled mid-trial; playback is already stopped and no
    /// outcome should be recorded.
    Aborted,
}

/// Drives one trial at a time: synthesize, hand to the sink, then suspend the
/// caller for `duration + settle_margin` of wall-clock time so the response
/// prompt never appears before the stimulus has finished.
pub struct TrialScheduler<C: Clock, S: AudioSink> {
    clock: C,
    sink: S,
    sample_rate_hz: u32,
    settle_margin: Duration,
    cancel: Arc<AtomicBool>,
}

impl<C: Clock, S: AudioSink> TrialScheduler<C, S> {
    pub fn new(clock: C, sink: S, sample_rate_hz: u32, settle_margin_s: f64) -> Self {
        Self {
            clock,
            sink,
            sample_rate_hz,
            settle_margin: Duration::from_secs_f64(settle_margin_s),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle an aborter (e.g. a Ctrl-C handler) can raise to stop the run.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn run_trial<R: Rng>(
        &mut self,
        trial_index: usize,
        spec: &TrialSpec,
        rng: &mut R,
    ) -> Result<ScheduleResult, ExperimentError> {
        let buffer = sigdet_synth::mix(&spec.parameters, self.sample_rate_hz, rng)?;
        let expected =
            Duration::from_secs_f64(spec.parameters.duration_s) + self.settle_margin;

        let started = self.clock.now();
        self.sink.play(&buffer)?;

        if !self.clock.wait(expected, &self.cancel) {
            self.sink.stop();
            return Ok(ScheduleResult::Aborted);
        }

        let elapsed = self.clock.elapsed(started);
        let reliable = elapsed + TIMING_TOLERANCE >= expected;
        if !reliable {
            let violation = ExperimentError::TimingViolation {
                expected_ms: expected.as_secs_f64() * 1e3,
                actual_ms: elapsed.as_secs_f64() * 1e3,
            };
            warn!(trial_index, "{violation}; outcome flagged unreliable");
        }

        Ok(ScheduleResult::Completed(TrialTiming {
            expected,
            elapsed,
            reliable,
        }))
    }

    /// Stop in-flight playback immediately. No outcome is recorded for a
    /// trial aborted this way.
    pub fn abort(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.sink.stop();
    }
}
