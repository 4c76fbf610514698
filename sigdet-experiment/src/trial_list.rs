use rand::Rng;
use rand::seq::SliceRandom;
use sigdet_core::{ExperimentError, TrialKind, TrialSpec};

use crate::config::ExperimentConfig;

/// Builds the ordered trial sequence at experiment setup: practice first
/// (signal always present), then the balanced, uniformly permuted main block.
pub struct TrialListBuilder<'a> {
    config: &'a ExperimentConfig,
}

impl<'a> TrialListBuilder<'a> {
    pub fn new(config: &'a ExperimentConfig) -> Self {
        Self { config }
    }

    pub fn practice(&self) -> Result<Vec<TrialSpec>, ExperimentError> {
        let parameters = self.config.practice_parameters()?;
        Ok((0..self.config.practice_trials)
            .map(|_| TrialSpec {
                kind: TrialKind::Practice,
                present: true,
                parameters: parameters.clone(),
            })
            .collect())
    }

    /// Half present, half absent, in a uniformly random permutation
    /// (Fisher-Yates via `SliceRandom::shuffle`). Odd totals are rejected:
    /// rounding one way or the other would silently unbalance the design.
    pub fn main<R: Rng>(&self, rng: &mut R) -> Result<Vec<TrialSpec>, ExperimentError> {
        let total = self.config.main_trials;
        if total % 2 != 0 {
            return Err(ExperimentError::invalid(
                "main_trials",
                format!("{total} is odd; present/absent trials must balance exactly"),
            ));
        }

        let mut flags: Vec<bool> = std::iter::repeat(true)
            .take(total / 2)
            .chain(std::iter::repeat(false).take(total / 2))
            .collect();
        flags.shuffle(rng);

        flags
            .into_iter()
            .map(|present| {
                Ok(TrialSpec {
                    kind: TrialKind::Main,
                    present,
                    parameters: self.config.main_parameters(present)?,
                })
            })
            .collect()
    }

    /// The full run: practice block followed by the shuffled main block.
    pub fn full_run<R: Rng>(&self, rng: &mut R) -> Result<Vec<TrialSpec>, ExperimentError> {
        let mut trials = self.practice()?;
        trials.extend(self.main(rng)?);
        Ok(trials)
    }
}
