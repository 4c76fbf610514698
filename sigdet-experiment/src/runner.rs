use rand::Rng;
use sigdet_audio::AudioSink;
use sigdet_core::{ExperimentError, Phase, ResponseValue, TrialKind, TrialOutcome, TrialSpec};
use sigdet_timing::Clock;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{error, info};

use crate::config::ExperimentConfig;
use crate::scheduler::{ScheduleResult, TrialScheduler};
use crate::trial_list::TrialListBuilder;

/// The UI/response collaborator. The engine hands it the prompt appropriate
/// for the phase and records whatever comes back without interpreting it.
pub trait ResponseCollector {
    /// Shown once before the first trial (instructions, ready prompt).
    fn welcome(&mut self, _config: &ExperimentConfig) {}

    /// Practice phase: "Did you hear the tone?" Yes/No.
    fn detection(&mut self, trial_index: usize) -> ResponseValue;

    /// Main phase: confidence then perceptual-reliance sliders.
    fn ratings(&mut self, trial_index: usize) -> ResponseValue;

    /// Shown once after the last trial.
    fn debrief(&mut self, _outcomes: &[TrialOutcome]) {}
}

/// Top-level run supervisor. Walks the phases, runs every trial through the
/// scheduler, collects one response per trial into the append-only outcome
/// log, and halts the whole run on the first error - a silently skipped
/// trial would corrupt the experimental design.
pub struct ExperimentRunner<P, C, S, R>
where
    P: Phase,
    C: Clock,
    S: AudioSink,
    R: Rng,
{
    pub phase: P,
    clock: C,
    rng: R,
    pub config: ExperimentConfig,
    scheduler: TrialScheduler<C, S>,
    outcomes: Vec<TrialOutcome>,
    trial_number: usize,
    aborted: bool,
}

impl<P, C, S, R> ExperimentRunner<P, C, S, R>
where
    P: Phase,
    C: Clock,
    S: AudioSink,
    R: Rng,
{
    pub fn new(
        config: ExperimentConfig,
        clock: C,
        sink: S,
        rng: R,
    ) -> Result<Self, ExperimentError> {
        config.validate()?;
        let scheduler = TrialScheduler::new(
            clock.clone(),
            sink,
            config.sample_rate_hz,
            config.settle_margin_s,
        );
        Ok(Self {
            phase: P::default(),
            clock,
            rng,
            config,
            scheduler,
            outcomes: Vec::new(),
            trial_number: 0,
            aborted: false,
        })
    }

    /// Raise this flag (e.g. from a Ctrl-C handler) to abort the run; the
    /// in-flight trial stops playback immediately and records no outcome.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.scheduler.cancel_handle()
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    pub fn run(
        &mut self,
        collector: &mut impl ResponseCollector,
    ) -> Result<&[TrialOutcome], ExperimentError> {
        // The whole list is built before the first trial so that any invalid
        // parameter fails the run up front.
        let builder = TrialListBuilder::new(&self.config);
        let practice = builder.practice()?;
        let main = TrialListBuilder::new(&self.config).main(&mut self.rng)?;

        loop {
            if self.phase.is_welcome() {
                info!("experiment start: {} trials total", self.config.total_trials());
                collector.welcome(&self.config);
            } else if self.phase.is_practice() {
                info!(trials = practice.len(), "practice phase");
                self.run_block(&practice, collector).inspect_err(|e| {
                    error!(trial = self.trial_number, "run halted: {e}");
                })?;
            } else if self.phase.is_main() {
                info!(trials = main.len(), "main phase");
                self.run_block(&main, collector).inspect_err(|e| {
                    error!(trial = self.trial_number, "run halted: {e}");
                })?;
            } else {
                collector.debrief(&self.outcomes);
            }

            if self.aborted {
                info!(completed = self.outcomes.len(), "run aborted");
                break;
            }
            match self.phase.next() {
                Some(next) => self.phase = next,
                None => break,
            }
        }

        Ok(&self.outcomes)
    }

    fn run_block(
        &mut self,
        specs: &[TrialSpec],
        collector: &mut impl ResponseCollector,
    ) -> Result<(), ExperimentError> {
        for spec in specs {
            let index = self.trial_number;
            info!(trial = index, kind = ?spec.kind, present = spec.present, "trial start");

            match self.scheduler.run_trial(index, spec, &mut self.rng)? {
                ScheduleResult::Aborted => {
                    self.aborted = true;
                    return Ok(());
                }
                ScheduleResult::Completed(timing) => {
                    let prompted = self.clock.now();
                    let response = match spec.kind {
                        TrialKind::Practice => collector.detection(index),
                        TrialKind::Main => collector.ratings(index),
                    };
                    let response_latency_ms = self.clock.elapsed(prompted).as_secs_f64() * 1e3;

                    self.outcomes.push(TrialOutcome {
                        trial_index: index,
                        kind: spec.kind,
                        present: spec.present,
                        response,
                        response_latency_ms,
                        timing_reliable: timing.reliable,
                    });
                    self.trial_number += 1;
                }
            }
        }
        Ok(())
    }
}
