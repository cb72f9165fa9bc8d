// src/audio/gain.rs

use crate::audio::types::SampleBuffer;
use crate::error::{AudioError, Result};

/// Multiply every sample in every channel by `factor`
///
/// A factor of 0 mutes. Factors above 1 may push samples outside
/// [-1.0, 1.0]; they are left unclipped so further edits stay lossless,
/// and the WAV encoder clips on export.
pub fn apply_gain(audio: &SampleBuffer, factor: f32) -> Result<SampleBuffer> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(AudioError::InvalidParameter(format!(
            "Gain factor must be a finite number >= 0, got {}",
            factor
        )));
    }

    let channels = audio
        .channels()
        .iter()
        .map(|channel| channel.iter().map(|&s| s * factor).collect())
        .collect();

    Ok(audio.with_channels(channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_audio() -> SampleBuffer {
        SampleBuffer::new(
            44100,
            vec![vec![0.0, 0.25, -0.5, 0.75, -1.0], vec![0.1, -0.2, 0.3, -0.4, 0.9]],
        )
        .unwrap()
    }

    #[test]
    fn test_gain_is_linear() {
        let audio = test_audio();
        let louder = apply_gain(&audio, 2.0).unwrap();

        for (orig, out) in audio.channels().iter().zip(louder.channels()) {
            for (&a, &b) in orig.iter().zip(out) {
                assert_eq!(b, 2.0 * a);
            }
        }
    }

    #[test]
    fn test_gain_does_not_clip() {
        let louder = apply_gain(&test_audio(), 2.0).unwrap();
        assert_eq!(louder.channel(0).unwrap()[4], -2.0);
        assert_eq!(louder.channel(1).unwrap()[4], 1.8);
    }

    #[test]
    fn test_zero_gain_mutes() {
        let muted = apply_gain(&test_audio(), 0.0).unwrap();
        assert!(muted.channels().iter().flatten().all(|&s| s == 0.0));
        assert_eq!(muted.frame_count(), 5);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            apply_gain(&test_audio(), -0.5),
            Err(AudioError::InvalidParameter(_))
        ));
        assert!(apply_gain(&test_audio(), f32::NAN).is_err());
        assert!(apply_gain(&test_audio(), f32::INFINITY).is_err());
    }
}
