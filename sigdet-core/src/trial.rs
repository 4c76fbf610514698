use serde::{Deserialize, Serialize};

use crate::stimulus::StimulusParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialKind {
    Practice,
    Main,
}

/// One entry of the trial list. Built at experiment setup, consumed exactly
/// once by the scheduler, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub kind: TrialKind,
    pub present: bool,
    pub parameters: StimulusParameters,
}

/// What the response collaborator hands back. The engine records it verbatim
/// and does not interpret response semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResponseValue {
    /// Practice phase: yes/no tone detection.
    Detection { heard: bool },
    /// Main phase: confidence and perceptual-reliance sliders, each in
    /// [-100, 100].
    Ratings { confidence: i32, reliance: i32 },
}

/// Recorded result per trial; appended to the run-wide ordered log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial_index: usize,
    pub kind: TrialKind,
    pub present: bool,
    pub response: ResponseValue,
    pub response_latency_ms: f64,
    /// False when the trial's wall-clock wait could not be honored; the
    /// outcome is kept (dropping it would change trial counts) but analyses
    /// can exclude it.
    pub timing_reliable: bool,
}
