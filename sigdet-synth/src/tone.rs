use std::f64::consts::PI;

use sigdet_core::{AudioBuffer, ExperimentError};

/// Sine segment whose instantaneous frequency moves linearly from
/// `low_cut_hz` at t = 0 to `high_cut_hz` at t = `ramp_s`. Phase is obtained
/// by integrating the instantaneous frequency per sample, so it is continuous
/// everywhere, including at the ramp boundary.
pub fn generate_tone(
    low_cut_hz: f64,
    high_cut_hz: f64,
    ramp_s: f64,
    sample_rate_hz: u32,
) -> Result<AudioBuffer, ExperimentError> {
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
    if !ramp_s.is_finite() || ramp_s <= 0.0 {
        return Err(ExperimentError::invalid(
            "ramp_s",
            format!("must be positive, got {ramp_s}"),
        ));
    }
    if sample_rate_hz == 0 {
        return Err(ExperimentError::invalid("sample_rate_hz", "must be positive"));
    }

    let len = (ramp_s * sample_rate_hz as f64).round() as usize;
    let dt = 1.0 / sample_rate_hz as f64;
    let sweep_hz = high_cut_hz - low_cut_hz;

    let mut phase = 0.0f64;
    let mut samples = Vec::with_capacity(len);
    for i in 0..len {
        samples.push(phase.sin() as f32);
        let t = i as f64 * dt;
        let freq_hz = low_cut_hz + sweep_hz * t / ramp_s;
        phase += 2.0 * PI * freq_hz * dt;
    }
    Ok(AudioBuffer::new(samples, sample_rate_hz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_matches_rounded_ramp() {
        let buf = generate_tone(50.0, 1000.0, 0.5, 48_000).unwrap();
        assert_eq!(buf.len(), 24_000);
    }

    #[test]
    fn starts_at_zero_phase() {
        let buf = generate_tone(50.0, 1000.0, 0.5, 48_000).unwrap();
        assert_eq!(buf.samples[0], 0.0);
        // First samples rise: positive initial frequency.
        assert!(buf.samples[1] > 0.0);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(generate_tone(0.0, 1000.0, 0.5, 48_000).is_err());
        assert!(generate_tone(1000.0, 50.0, 0.5, 48_000).is_err());
        assert!(generate_tone(50.0, 1000.0, 0.0, 48_000).is_err());
        assert!(generate_tone(50.0, 1000.0, 0.5, 0).is_err());
    }
}
