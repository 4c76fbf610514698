//! Pure, stateless stimulus synthesis: white noise, band-pass masker
//! shaping, the frequency-ramped tone, and the per-trial mix. Every function
//! is buffer-to-buffer with no retained state, so synthesis is safe to run on
//! any thread and trivial to test.

pub mod filter;
pub mod mixer;
pub mod noise;
pub mod tone;

pub use filter::BandpassFilter;
pub use mixer::mix;
pub use noise::generate_noise;
pub use tone::generate_tone;
