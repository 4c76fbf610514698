use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};
use sigdet_core::{AudioBuffer, ExperimentError};
use tracing::{debug, error};

use crate::limiter::PeakLimiter;

/// Playback sink the scheduler renders into: load a mono buffer and start it
/// immediately, stop whatever is in flight.
pub trait AudioSink {
    fn play(&mut self, buffer: &AudioBuffer) -> Result<(), ExperimentError>;
    fn stop(&mut self);
}

impl AudioSink for Box<dyn AudioSink> {
    fn play(&mut self, buffer: &AudioBuffer) -> Result<(), ExperimentError> {
        (**self).play(buffer)
    }
    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Default-output-device sink. Acquired once at run start and released on
/// drop; mono samples are fanned out to every device channel through a ring
/// buffer the stream callback drains.
pub struct CpalSink {
    stream: Option<cpal::Stream>,
    producer: HeapProd<f32>,
    sample_rate_hz: u32,
    limiter: PeakLimiter,
    failed: Arc<AtomicBool>,
    scratch: Vec<f32>,
}

impl CpalSink {
    pub fn new(sample_rate_hz: u32) -> Result<Self, ExperimentError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ExperimentError::device("no output device"))?;

        let supported = device
            .default_output_config()
            .map_err(|e| ExperimentError::device(format!("no default config: {e}")))?;
        let channels = supported.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: sample_rate_hz,
            buffer_size: cpal::BufferSize::Default,
        };

        // Room for several seconds of mono stimulus; the whole trial buffer
        // is pushed up front.
        let rb = HeapRb::<f32>::new(sample_rate_hz as usize * 8);
        let (producer, mut consumer): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let failed = Arc::new(AtomicBool::new(false));
        let failed_in_cb = failed.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let n_frames = data.len() / channels as usize;
                    for frame in 0..n_frames {
                        // Silence once the stimulus is exhausted.
                        let s = consumer.try_pop().unwrap_or(0.0);
                        for ch in 0..channels as usize {
                            data[frame * channels as usize + ch] = s;
                        }
                    }
                },
                move |err| {
                    error!("output stream error: {err}");
                    failed_in_cb.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| ExperimentError::device(format!("cannot build stream: {e}")))?;
        stream
            .play()
            .map_err(|e| ExperimentError::device(format!("cannot start stream: {e}")))?;

        debug!(sample_rate_hz, channels, "output stream running");
        Ok(Self {
            stream: Some(stream),
            producer,
            sample_rate_hz,
            limiter: PeakLimiter::new(sample_rate_hz),
            failed,
            scratch: Vec::new(),
        })
    }
}

impl AudioSink for CpalSink {
    fn play(&mut self, buffer: &AudioBuffer) -> Result<(), ExperimentError> {
        if self.stream.is_none() {
            return Err(ExperimentError::device("stream was stopped"));
        }
        if self.failed.load(Ordering::Relaxed) {
            return Err(ExperimentError::device("stream failed during playback"));
        }
        if buffer.sample_rate_hz != self.sample_rate_hz {
            return Err(ExperimentError::invalid(
                "sample_rate_hz",
                format!(
                    "buffer at {} Hz, stream at {} Hz",
                    buffer.sample_rate_hz, self.sample_rate_hz
                ),
            ));
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&buffer.samples);
        self.limiter.process(&mut self.scratch);

        let mut offset = 0;
        while offset < self.scratch.len() {
            if self.failed.load(Ordering::Relaxed) {
                return Err(ExperimentError::device("stream failed during playback"));
            }
            let written = self.producer.push_slice(&self.scratch[offset..]);
            offset += written;
            if offset < self.scratch.len() {
                std::thread::sleep(std::time::Duration::from_micros(200));
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the stream stops playback immediately.
        self.stream.take();
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.stream.take();
    }
}

/// Sink that discards everything; used for dry runs and tests.
#[derive(Debug, Default)]
pub struct NullSink {
    pub buffers_played: usize,
    pub samples_played: usize,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for NullSink {
    fn play(&mut self, buffer: &AudioBuffer) -> Result<(), ExperimentError> {
        self.buffers_played += 1;
        self.samples_played += buffer.len();
        Ok(())
    }

    fn stop(&mut self) {}
}
