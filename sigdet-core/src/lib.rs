pub mod buffer;
pub mod error;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use buffer::AudioBuffer;
pub use error::ExperimentError;
pub use phase::{Phase, StandardPhase};
pub use stimulus::StimulusParameters;
pub use trial::{ResponseValue, TrialKind, TrialOutcome, TrialSpec};
