use sigdet_synth::generate_tone;

const SAMPLE_RATE: u32 = 48_000;
const LOW_HZ: f64 = 50.0;
const HIGH_HZ: f64 = 1000.0;
const RAMP_S: f64 = 0.5;

/// Cycles completed by the ideal linear chirp over [0, t]:
/// integral of f(t) = low + (high - low) * t / ramp.
fn ideal_cycles(t: f64) -> f64 {
    LOW_HZ * t + (HIGH_HZ - LOW_HZ) * t * t / (2.0 * RAMP_S)
}

fn count_sign_changes(samples: &[f32]) -> usize {
    samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count()
}

#[test]
fn instantaneous_frequency_matches_ramp_at_both_ends() {
    let buf = generate_tone(LOW_HZ, HIGH_HZ, RAMP_S, SAMPLE_RATE).unwrap();
    let window_s = 0.05;
    let window = (window_s * SAMPLE_RATE as f64).round() as usize;

    // Zero crossings over a short window track the mean frequency there; the
    // analytic cycle count gives the expected number without assuming
    // anything about how the implementation integrates phase.
    let start_expected = 2.0 * ideal_cycles(window_s);
    let start_actual = count_sign_changes(&buf.samples[..window]) as f64;
    assert!(
        (start_actual - start_expected).abs() <= 2.0,
        "start window: {start_actual} crossings, expected ~{start_expected:.1}"
    );

    let end_expected = 2.0 * (ideal_cycles(RAMP_S) - ideal_cycles(RAMP_S - window_s));
    let end_actual = count_sign_changes(&buf.samples[buf.len() - window..]) as f64;
    assert!(
        (end_actual - end_expected).abs() <= 3.0,
        "end window: {end_actual} crossings, expected ~{end_expected:.1}"
    );

    // Mean frequency near t=0 must sit at the low bound, not the high one.
    // Crossing counts quantize to whole half-cycles, so the tolerance is
    // wider than the window's ~10 Hz resolution but far below the high bound.
    let start_mean_hz = start_actual / (2.0 * window_s);
    let ideal_start_mean_hz = ideal_cycles(window_s) / window_s;
    assert!(
        (start_mean_hz - ideal_start_mean_hz).abs() / ideal_start_mean_hz < 0.15,
        "start mean {start_mean_hz:.1} Hz vs ideal {ideal_start_mean_hz:.1} Hz"
    );
}

#[test]
fn phase_is_continuous() {
    let buf = generate_tone(LOW_HZ, HIGH_HZ, RAMP_S, SAMPLE_RATE).unwrap();
    // A unit sine at frequency f moves at most 2*pi*f/fs per sample; any jump
    // beyond what the top ramp frequency allows means a phase discontinuity.
    let max_step = 2.0 * std::f64::consts::PI * HIGH_HZ / SAMPLE_RATE as f64;
    let worst = buf
        .samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs() as f64)
        .fold(0.0f64, f64::max);
    assert!(
        worst <= max_step * 1.05,
        "sample-to-sample jump {worst:.4} exceeds {max_step:.4}"
    );
}
