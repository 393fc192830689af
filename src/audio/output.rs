use crate::audio::queue::PlaybackQueue;
use crate::{AquadeskError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Speaker playback for the voice relay.
///
/// The device callback drains the shared [`PlaybackQueue`], duplicating the
/// mono samples across the device's channels and filling the remainder with
/// silence. The queue's consumed counter doubles as the playback clock.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    is_playing: Arc<Mutex<bool>>,
}

impl AudioOutput {
    /// Create a new audio output with the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| AquadeskError::AudioDeviceError("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                AquadeskError::AudioDeviceError(format!("Failed to get output config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            is_playing: Arc::new(Mutex::new(false)),
        })
    }

    /// Sample rate the device consumes frames at
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start draining the queue into the output device
    pub fn start_playback(&mut self, queue: PlaybackQueue) -> Result<()> {
        if *self.is_playing.lock() {
            warn!("Already playing");
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let is_playing = Arc::clone(&self.is_playing);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !*is_playing.lock() {
                        data.fill(0.0);
                        return;
                    }

                    let frames_needed = data.len() / channels;
                    let samples = queue.pop(frames_needed);

                    for (i, frame) in data.chunks_mut(channels).enumerate() {
                        let sample = samples.get(i).copied().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                AquadeskError::AudioDeviceError(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            AquadeskError::AudioDeviceError(format!("Failed to start output stream: {}", e))
        })?;

        *self.is_playing.lock() = true;
        self.stream = Some(stream);

        info!("Started audio playback");
        Ok(())
    }

    /// Stop playback and release the stream
    pub fn stop_playback(&mut self) {
        *self.is_playing.lock() = false;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio playback");
        }
    }

    pub fn is_playing(&self) -> bool {
        *self.is_playing.lock()
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_output_creation() {
        // This test might fail in CI environments without audio devices
        if let Ok(output) = AudioOutput::new() {
            assert!(output.sample_rate() > 0);
            assert!(output.channels() > 0);
        }
    }

    #[test]
    fn test_playback_state() {
        if let Ok(mut output) = AudioOutput::new() {
            assert!(!output.is_playing());

            let queue = PlaybackQueue::new(1024);
            if output.start_playback(queue).is_ok() {
                assert!(output.is_playing());

                output.stop_playback();
                assert!(!output.is_playing());
            }
        }
    }
}
