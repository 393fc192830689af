//! Sample-rate conversion between the capture device, the wire rates, and
//! the playback device.
//!
//! The relay works in mono throughout (capture is folded before resampling,
//! the endpoint sends mono), so the resampler is single-channel.

use crate::{AquadeskError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(AquadeskError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        // chunk_size is the number of frames consumed per process() call
        let chunk_size = 1024;

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, chunk_size, 1)
            .map_err(|e| {
                AquadeskError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Resample a block of mono samples.
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = self.resampler.input_frames_max();
        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

        let mut offset = 0;
        while offset < input.len() {
            let remaining = input.len() - offset;
            let frames_to_read = remaining.min(chunk_size);

            // SincFixedIn consumes exactly chunk_size frames per call; pad
            // the tail chunk with zeros and trim the matching output.
            let mut chunk = vec![0.0f32; chunk_size];
            chunk[..frames_to_read].copy_from_slice(&input[offset..offset + frames_to_read]);

            let resampled = self
                .resampler
                .process(&[chunk], None)
                .map_err(|e| {
                    AquadeskError::AudioProcessingError(format!("Resampling failed: {}", e))
                })?;

            let produced = resampled[0].len();
            let frames_to_take = if remaining < chunk_size {
                ((frames_to_read as f64) * ratio).ceil() as usize
            } else {
                produced
            };
            output.extend_from_slice(&resampled[0][..frames_to_take.min(produced)]);

            offset += frames_to_read;
        }

        Ok(output)
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Reset the resampler's internal filter state.
    pub fn reset(&mut self) {
        self.resampler.reset();
    }
}

/// Resample in one step, passing the input through when the rates match.
pub fn resample_audio(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }
    let mut resampler = AudioResampler::new(input_rate, output_rate)?;
    resampler.resample(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_rejects_zero_rate() {
        assert!(AudioResampler::new(0, 16_000).is_err());
        assert!(AudioResampler::new(48_000, 0).is_err());
    }

    #[test]
    fn test_downsample_produces_expected_length() {
        let mut resampler = AudioResampler::new(48_000, 16_000).unwrap();
        let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resampler.resample(&input).unwrap();
        // A third of the input length, within chunking tolerance.
        let expected = input.len() / 3;
        assert!((output.len() as i64 - expected as i64).unsigned_abs() < 64);
    }

    #[test]
    fn test_same_rate_passthrough() {
        let input = vec![0.1f32, 0.2, 0.3];
        let output = resample_audio(&input, 24_000, 24_000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let mut resampler = AudioResampler::new(24_000, 48_000).unwrap();
        assert!(resampler.resample(&[]).unwrap().is_empty());
    }
}
