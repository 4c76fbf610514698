use std::f64::consts::PI;

use sigdet_core::{AudioBuffer, ExperimentError};

/// Second-order band-pass biquad (RBJ cookbook, 0 dB peak gain variant) with
/// centre frequency `(low + high) / 2` and quality factor
/// `Q = (high - low) / (low + high)`. Peak gain is unity, so output stays
/// bounded for bounded input.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sample_rate_hz: u32,
    // Coefficients normalized by a0.
    b0: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BandpassFilter {
    pub fn new(
        low_cut_hz: f64,
        high_cut_hz: f64,
        sample_rate_hz: u32,
    ) -> Result<Self, ExperimentError> {
        if !low_cut_hz.is_finite() || low_cut_hz <= 0.0 {
            return Err(ExperimentError::invalid(
                "low_cut_hz",
                format!("must be positive, got {low_cut_hz}"),
            ));
        }
        if !high_cut_hz.is_finite() || high_cut_hz <= low_cut_hz {
            return Err(ExperimentError::invalid(
                "high_cut_hz",
                format!("must exceed low_cut_hz ({low_cut_hz}), got {high_cut_hz}"),
            ));
        }
        if sample_rate_hz == 0 {
            return Err(ExperimentError::invalid("sample_rate_hz", "must be positive"));
        }
        let center_hz = (low_cut_hz + high_cut_hz) / 2.0;
        let nyquist_hz = sample_rate_hz as f64 / 2.0;
        if center_hz >= nyquist_hz {
            return Err(ExperimentError::invalid(
                "high_cut_hz",
                format!("band centre {center_hz} Hz is at or above Nyquist ({nyquist_hz} Hz)"),
            ));
        }

        let fs = sample_rate_hz as f64;
        let w0 = 2.0 * PI * center_hz / fs;
        let q = (high_cut_hz - low_cut_hz) / (low_cut_hz + high_cut_hz);
        let alpha = w0.sin() / (2.0 * q);

        // b1 is identically zero for the band-pass section.
        let a0 = 1.0 + alpha;
        Ok(Self {
            sample_rate_hz,
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
        })
    }

    /// Run the section over a buffer, Direct Form II transposed. Output has
    /// the same length as the input; filter state lives on the stack, so each
    /// call is independent. A buffer at a different rate than the one the
    /// coefficients were designed for is rejected: filtering it anyway would
    /// silently shift the band.
    pub fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer, ExperimentError> {
        if input.sample_rate_hz != self.sample_rate_hz {
            return Err(ExperimentError::invalid(
                "sample_rate_hz",
                format!(
                    "buffer at {} Hz, filter designed for {} Hz",
                    input.sample_rate_hz, self.sample_rate_hz
                ),
            ));
        }
        let mut s1 = 0.0f64;
        let mut s2 = 0.0f64;
        let samples = input
            .samples
            .iter()
            .map(|&x| {
                let x = x as f64;
                let y = self.b0 * x + s1;
                s1 = -self.a1 * y + s2;
                s2 = self.b2 * x - self.a2 * y;
                y as f32
            })
            .collect();
        Ok(AudioBuffer::new(samples, input.sample_rate_hz))
    }
}
