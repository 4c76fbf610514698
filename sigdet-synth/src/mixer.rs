use rand::Rng;
use sigdet_core::{AudioBuffer, ExperimentError, StimulusParameters};

use crate::filter::BandpassFilter;
use crate::noise::generate_noise;
use crate::tone::generate_tone;

/// Render one trial's waveform: band-limited noise at `noise_amplitude`, plus
/// the scaled tone ramp added in place from `tone_onset_s` when `present`.
///
/// The mix is returned unclamped, matching the reference behavior; configured
/// gains keep it well inside [-1, 1] and the playback sink carries a peak
/// limiter for anything louder.
pub fn mix<R: Rng>(
    parameters: &StimulusParameters,
    sample_rate_hz: u32,
    rng: &mut R,
) -> Result<AudioBuffer, ExperimentError> {
    parameters.validate()?;

    let noise = generate_noise(parameters.duration_s, sample_rate_hz, rng)?;
    let filter = BandpassFilter::new(
        parameters.low_cut_hz,
        parameters.high_cut_hz,
        sample_rate_hz,
    )?;
    let mut out = filter.apply(&noise)?;
    let noise_gain = parameters.noise_amplitude as f32;
    for s in &mut out.samples {
        *s *= noise_gain;
    }

    if parameters.present {
        let tone = generate_tone(
            parameters.low_cut_hz,
            parameters.high_cut_hz,
            parameters.tone_ramp_s,
            sample_rate_hz,
        )?;
        let start = (parameters.tone_onset_s * sample_rate_hz as f64).round() as usize;
        let tone_gain = parameters.tone_amplitude as f32;
        // Truncate the overlay at the trial buffer's end rather than extend it.
        for (i, &t) in tone.samples.iter().enumerate() {
            match out.samples.get_mut(start + i) {
                Some(slot) => *slot += t * tone_gain,
                None => break,
            }
        }
    }

    Ok(out)
}
