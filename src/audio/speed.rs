// src/audio/speed.rs

use crate::audio::encoder::{frame_bytes, MAX_DATA_BYTES};
use crate::audio::types::SampleBuffer;
use crate::error::{AudioError, Result};

/// Change playback speed by resampling, without pitch correction
///
/// Produces `round(frames / factor)` frames. Output frame `i` reads input
/// position `i * factor`, linearly interpolated between the two nearest
/// input frames. Every channel uses the same positions, so channels stay
/// time-aligned. `factor > 1` is faster and higher, `factor < 1` slower and
/// lower.
pub fn change_speed(audio: &SampleBuffer, factor: f64) -> Result<SampleBuffer> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AudioError::InvalidParameter(format!(
            "Speed factor must be a finite number > 0, got {}",
            factor
        )));
    }

    if audio.is_empty() {
        return Err(AudioError::InvalidParameter(
            "Cannot change the speed of empty audio".to_string(),
        ));
    }

    let frames = audio.frame_count();
    let output_frames = (frames as f64 / factor).round();

    // Checked before allocating: no WAV can hold more
    let max_frames = (MAX_DATA_BYTES / frame_bytes(audio.channel_count())) as f64;
    if output_frames > max_frames {
        return Err(AudioError::InvalidParameter(format!(
            "Speed factor {} would stretch {} frames past the WAV size limit",
            factor, frames
        )));
    }

    let output_frames = output_frames as usize;
    if output_frames == 0 {
        return Err(AudioError::InvalidParameter(format!(
            "Speed factor {} leaves no audio from {} frames",
            factor, frames
        )));
    }

    // Shared (index, fraction) per output frame
    let positions: Vec<(usize, f32)> = (0..output_frames)
        .map(|i| {
            let position = i as f64 * factor;
            let index = position.floor() as usize;
            (index, (position - index as f64) as f32)
        })
        .collect();

    let last = frames - 1;
    let channels = audio
        .channels()
        .iter()
        .map(|channel| {
            positions
                .iter()
                .map(|&(index, fraction)| {
                    let a = channel[index.min(last)];
                    let b = channel[(index + 1).min(last)];
                    a + (b - a) * fraction
                })
                .collect()
        })
        .collect();

    Ok(audio.with_channels(channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> SampleBuffer {
        let up: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
        let down: Vec<f32> = up.iter().map(|s| -s).collect();
        SampleBuffer::new(1000, vec![up, down]).unwrap()
    }

    #[test]
    fn test_double_speed_halves_length() {
        let audio = ramp(1000);
        let fast = change_speed(&audio, 2.0).unwrap();

        assert_eq!(fast.frame_count(), 500);
        assert_eq!(fast.sample_rate(), 1000);
        // Integer positions read input samples directly
        assert_eq!(fast.channel(0).unwrap()[10], audio.channel(0).unwrap()[20]);
    }

    #[test]
    fn test_half_speed_interpolates() {
        let audio = SampleBuffer::new(1000, vec![vec![0.0, 1.0, 0.0, -1.0]]).unwrap();
        let slow = change_speed(&audio, 0.5).unwrap();

        assert_eq!(slow.frame_count(), 8);
        assert_eq!(slow.channel(0).unwrap(), &[0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.0]);
    }

    #[test]
    fn test_unit_speed_is_identity() {
        let audio = ramp(321);
        assert_eq!(change_speed(&audio, 1.0).unwrap(), audio);
    }

    #[test]
    fn test_channels_stay_aligned() {
        let audio = ramp(997);
        let out = change_speed(&audio, 1.37).unwrap();

        let left = out.channel(0).unwrap();
        let right = out.channel(1).unwrap();
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            assert_eq!(*l, -*r);
        }
    }

    #[test]
    fn test_rejects_bad_factors() {
        let audio = ramp(100);
        assert!(change_speed(&audio, 0.0).is_err());
        assert!(change_speed(&audio, -1.0).is_err());
        assert!(change_speed(&audio, f64::NAN).is_err());
        // 100 frames at 1000x rounds to nothing
        assert!(change_speed(&audio, 1000.0).is_err());
    }

    #[test]
    fn test_rejects_unencodable_length() {
        let audio = ramp(100);

        assert!(matches!(
            change_speed(&audio, 1e-20),
            Err(AudioError::InvalidParameter(_))
        ));
        // 100 stereo frames slowed 1e8x is 40GB of PCM
        assert!(matches!(
            change_speed(&audio, 1e-8),
            Err(AudioError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_empty_audio() {
        let audio = SampleBuffer::silent(1000, 1, 0).unwrap();
        assert!(matches!(
            change_speed(&audio, 2.0),
            Err(AudioError::InvalidParameter(_))
        ));
    }
}
