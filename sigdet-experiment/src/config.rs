use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sigdet_core::{ExperimentError, StimulusParameters};

/// Run-wide configuration. Defaults carry the reference constants; any
/// overrides are validated eagerly before a single trial runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub practice_trials: usize,
    pub main_trials: usize,
    pub trial_duration_s: f64,
    pub low_cut_hz: f64,
    pub high_cut_hz: f64,
    pub tone_onset_s: f64,
    pub tone_ramp_s: f64,
    pub practice_noise_amplitude: f64,
    pub main_noise_amplitude: f64,
    pub tone_amplitude: f64,
    pub settle_margin_s: f64,
    pub sample_rate_hz: u32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            practice_trials: 5,
            main_trials: 20,
            trial_duration_s: 2.5,
            low_cut_hz: 50.0,
            high_cut_hz: 1000.0,
            tone_onset_s: 1.75,
            tone_ramp_s: 0.5,
            practice_noise_amplitude: 0.05,
            main_noise_amplitude: 0.07,
            tone_amplitude: 0.1,
            settle_margin_s: 0.05,
            sample_rate_hz: 48_000,
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<Self, ExperimentError> {
        let text = fs::read_to_string(path).map_err(|e| {
            ExperimentError::invalid("config", format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ExperimentError::invalid("config", format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.main_trials % 2 != 0 {
            return Err(ExperimentError::invalid(
                "main_trials",
                format!(
                    "{} is odd; present/absent trials must balance exactly",
                    self.main_trials
                ),
            ));
        }
        if !self.settle_margin_s.is_finite() || self.settle_margin_s < 0.0 {
            return Err(ExperimentError::invalid(
                "settle_margin_s",
                format!("must be non-negative, got {}", self.settle_margin_s),
            ));
        }
        // Both phases' stimulus parameters must be constructible up front.
        self.practice_parameters()?;
        self.main_parameters(true)?;
        self.main_parameters(false)?;
        Ok(())
    }

    /// Practice stimuli: signal always present, softer masker.
    pub fn practice_parameters(&self) -> Result<StimulusParameters, ExperimentError> {
        StimulusParameters::new(
            self.trial_duration_s,
            self.low_cut_hz,
            self.high_cut_hz,
            self.tone_amplitude,
            self.practice_noise_amplitude,
            self.tone_onset_s,
            self.tone_ramp_s,
            true,
        )
    }

    pub fn main_parameters(&self, present: bool) -> Result<StimulusParameters, ExperimentError> {
        StimulusParameters::new(
            self.trial_duration_s,
            self.low_cut_hz,
            self.high_cut_hz,
            self.tone_amplitude,
            self.main_noise_amplitude,
            self.tone_onset_s,
            self.tone_ramp_s,
            present,
        )
    }

    pub fn total_trials(&self) -> usize {
        self.practice_trials + self.main_trials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_reference_constants_and_valid() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.practice_trials, 5);
        assert_eq!(config.main_trials, 20);
        assert_eq!(config.trial_duration_s, 2.5);
        assert_eq!(config.tone_onset_s, 1.75);
        assert_eq!(config.practice_noise_amplitude, 0.05);
        assert_eq!(config.main_noise_amplitude, 0.07);
    }

    #[test]
    fn odd_main_count_is_rejected() {
        let config = ExperimentConfig {
            main_trials: 21,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidParameter { what: "main_trials", .. })
        ));
    }

    #[test]
    fn bad_stimulus_constants_are_caught_at_config_time() {
        let config = ExperimentConfig {
            tone_onset_s: 3.0, // past the 2.5 s trial
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = ExperimentConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: ExperimentConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.main_trials, config.main_trials);
        assert_eq!(back.sample_rate_hz, config.sample_rate_hz);
    }
}
