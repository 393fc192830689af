//! PCM conversion between the capture/playback float format and the wire
//! format the voice endpoint expects: 16-bit little-endian samples, base64
//! framed.

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Convert float samples in [-1.0, 1.0] to 16-bit little-endian bytes.
pub fn f32_to_i16_le(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert 16-bit little-endian bytes back to float samples.
/// A trailing odd byte is dropped.
pub fn i16_le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let value = i16::from_le_bytes([pair[0], pair[1]]);
            value as f32 / i16::MAX as f32
        })
        .collect()
}

/// Encode float samples into a base64 PCM frame for the uplink.
pub fn encode_frame(samples: &[f32]) -> String {
    STANDARD.encode(f32_to_i16_le(samples))
}

/// Decode a base64 PCM frame from the downlink into float samples.
pub fn decode_frame(data: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(data)?;
    Ok(i16_le_to_f32(&bytes))
}

/// Fold interleaved multi-channel samples down to mono by averaging.
pub fn fold_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_round_trip() {
        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let decoded = i16_le_to_f32(&f32_to_i16_le(&samples));
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(decoded.iter()) {
            assert!((a - b).abs() < 1.0e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_out_of_range_samples_clamp() {
        let bytes = f32_to_i16_le(&[2.0, -2.0]);
        let decoded = i16_le_to_f32(&bytes);
        assert!((decoded[0] - 1.0).abs() < 1.0e-3);
        assert!((decoded[1] + 1.0).abs() < 1.0e-3);
    }

    #[test]
    fn test_frame_round_trip() {
        let samples: Vec<f32> = (0..160).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        let frame = encode_frame(&samples);
        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(decoded.len(), samples.len());
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(decode_frame("not base64!!!").is_err());
    }

    #[test]
    fn test_fold_to_mono_averages_channels() {
        let stereo = vec![1.0, -1.0, 0.5, -0.5, 0.8, -0.8];
        let mono = fold_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 3);
        assert_eq!(mono[0], 0.0);
    }
}
