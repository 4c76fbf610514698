//! Playback boundary: the engine hands a rendered mono buffer to an
//! [`AudioSink`] and otherwise knows nothing about the device.

pub mod limiter;
pub mod sink;

pub use limiter::PeakLimiter;
pub use sink::{AudioSink, CpalSink, NullSink};
