/// Mono peak limiter run on every buffer before it reaches the device. The
/// mixer leaves its output unclamped, so this is the output guard against a
/// misconfigured gain; at the reference amplitudes it stays transparent.
#[derive(Debug)]
pub struct PeakLimiter {
    ceiling: f32,
    attack_coeff: f32,
    release_coeff: f32,
    gain: f32,
}

impl PeakLimiter {
    pub fn new(sample_rate_hz: u32) -> Self {
        let sample_rate = (sample_rate_hz as f32).max(1.0);
        Self {
            ceiling: 0.98,
            attack_coeff: time_to_coeff(0.5, sample_rate),
            release_coeff: time_to_coeff(50.0, sample_rate),
            gain: 1.0,
        }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for s in samples.iter_mut() {
            let x = if s.is_finite() { *s } else { 0.0 };
            let abs = x.abs();
            let target = if abs > self.ceiling && abs > 0.0 {
                self.ceiling / abs
            } else {
                1.0
            };
            self.gain = if target < self.gain {
                self.attack_coeff * self.gain + (1.0 - self.attack_coeff) * target
            } else {
                self.release_coeff * self.gain + (1.0 - self.release_coeff) * target
            };
            *s = (x * self.gain).clamp(-self.ceiling, self.ceiling);
        }
    }
}

fn time_to_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    let time_s = time_ms.max(0.0) * 0.001;
    if time_s <= 0.0 {
        0.0
    } else {
        (-1.0 / (time_s * sample_rate)).exp()
    }
}
