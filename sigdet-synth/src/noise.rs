use rand::Rng;
use sigdet_core::{AudioBuffer, ExperimentError};

/// Uniform white noise on [-1, 1], `round(duration_s * sample_rate_hz)`
/// samples long. Generic over the RNG so tests can inject a seeded `StdRng`
/// while production runs use OS entropy.
pub fn generate_noise<R: Rng>(
    duration_s: f64,
    sample_rate_hz: u32,
    rng: &mut R,
) -> Result<AudioBuffer, ExperimentError> {
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return Err(ExperimentError::invalid(
            "duration_s",
            format!("must be positive and finite, got {duration_s}"),
        ));
    }
    if sample_rate_hz == 0 {
        return Err(ExperimentError::invalid("sample_rate_hz", "must be positive"));
    }

    let len = (duration_s * sample_rate_hz as f64).round() as usize;
    let samples = (0..len).map(|_| rng.random_range(-1.0f32..=1.0)).collect();
    Ok(AudioBuffer::new(samples, sample_rate_hz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn length_matches_rounded_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let buf = generate_noise(2.5, 48_000, &mut rng).unwrap();
        assert_eq!(buf.len(), 120_000);
        // A duration that does not land on a sample boundary rounds.
        let buf = generate_noise(0.1001, 48_000, &mut rng).unwrap();
        assert_eq!(buf.len(), 4805);
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let buf = generate_noise(1.0, 48_000, &mut rng).unwrap();
        assert!(buf.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_noise(0.25, 48_000, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_noise(0.25, 48_000, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generate_noise(0.0, 48_000, &mut rng).is_err());
        assert!(generate_noise(-1.0, 48_000, &mut rng).is_err());
        assert!(generate_noise(f64::INFINITY, 48_000, &mut rng).is_err());
        assert!(generate_noise(1.0, 0, &mut rng).is_err());
    }
}
