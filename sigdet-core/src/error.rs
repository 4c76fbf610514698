use thiserror::Error;

/// Error kinds the engine can surface. Every variant is fatal to the run
/// except `TimingViolation`, which flags the affected trial's outcome as
/// unreliable instead of discarding it.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("invalid parameter `{what}`: {details}")]
    InvalidParameter { what: &'static str, details: String },

    #[error("audio output unavailable: {details}")]
    AudioDeviceUnavailable { details: String },

    #[error("timing violation: expected {expected_ms:.1} ms of wall time, observed {actual_ms:.1} ms")]
    TimingViolation { expected_ms: f64, actual_ms: f64 },
}

impl ExperimentError {
    pub fn invalid(what: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            what,
            details: details.into(),
        }
    }

    pub fn device(details: impl Into<String>) -> Self {
        Self::AudioDeviceUnavailable {
            details: details.into(),
        }
    }
}
