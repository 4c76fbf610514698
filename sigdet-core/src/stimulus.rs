use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;

/// Everything the synthesis pipeline needs to render one trial's stimulus.
/// One instance per trial; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusParameters {
    /// Total trial duration in seconds.
    pub duration_s: f64,
    /// Lower edge of the masker band; also the tone ramp's start frequency.
    pub low_cut_hz: f64,
    /// Upper edge of the masker band; also the tone ramp's end frequency.
    pub high_cut_hz: f64,
    /// Gain applied to the tone segment, in [0, 1].
    pub tone_amplitude: f64,
    /// Gain applied to the band-limited noise, in [0, 1].
    pub noise_amplitude: f64,
    /// Tone start time relative to trial start, in [0, duration_s).
    pub tone_onset_s: f64,
    /// Length of the linear frequency ramp.
    pub tone_ramp_s: f64,
    /// Whether the tone is embedded at all.
    pub present: bool,
}

impl StimulusParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        duration_s: f64,
        low_cut_hz: f64,
        high_cut_hz: f64,
        tone_amplitude: f64,
        noise_amplitude: f64,
        tone_onset_s: f64,
        tone_ramp_s: f64,
        present: bool,
    ) -> Result<Self, ExperimentError> {
        let params = Self {
            duration_s,
            low_cut_hz,
            high_cut_hz,
            tone_amplitude,
            noise_amplitude,
            tone_onset_s,
            tone_ramp_s,
            present,
        };
        params.validate()?;
        Ok(params)
    }

    /// Eager validation. Substituting defaults for a malformed value would
    /// silently change the experimental manipulation, so any violation is
    /// fatal to the run.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return Err(ExperimentError::invalid(
                "duration_s",
                format!("must be positive and finite, got {}", self.duration_s),
            ));
        }
        if !self.low_cut_hz.is_finite() || self.low_cut_hz <= 0.0 {
            return Err(ExperimentError::invalid(
                "low_cut_hz",
                format!("must be positive, got {}", self.low_cut_hz),
            ));
        }
        if !self.high_cut_hz.is_finite() || self.high_cut_hz <= self.low_cut_hz {
            return Err(ExperimentError::invalid(
                "high_cut_hz",
                format!(
                    "must exceed low_cut_hz ({}), got {}",
                    self.low_cut_hz, self.high_cut_hz
                ),
            ));
        }
        for (name, value) in [
            ("tone_amplitude", self.tone_amplitude),
            ("noise_amplitude", self.noise_amplitude),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ExperimentError::InvalidParameter {
                    what: name,
                    details: format!("must be in [0, 1], got {value}"),
                });
            }
        }
        if !self.tone_onset_s.is_finite()
            || self.tone_onset_s < 0.0
            || self.tone_onset_s >= self.duration_s
        {
            return Err(ExperimentError::invalid(
                "tone_onset_s",
                format!(
                    "must be in [0, {}), got {}",
                    self.duration_s, self.tone_onset_s
                ),
            ));
        }
        if !self.tone_ramp_s.is_finite() || self.tone_ramp_s <= 0.0 {
            return Err(ExperimentError::invalid(
                "tone_ramp_s",
                format!("must be positive, got {}", self.tone_ramp_s),
            ));
        }
        Ok(())
    }
}
