// src/audio/trim.rs

use crate::audio::types::{SampleBuffer, TrimParams};
use crate::error::{AudioError, Result};

/// Trim audio data to a specific time range
///
/// `start` is clamped to [0, duration] and `end` to [start, duration]; both
/// are then rounded to the nearest frame. Every channel is sliced to
/// `[start_frame, end_frame)`.
///
/// # Returns
/// New SampleBuffer containing only the trimmed portion, or
/// `InvalidRange` when the clamped range holds no frames
///
/// # Example
/// ```
/// use wavesmith_lib::audio::{trim_audio, SampleBuffer, TrimParams};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // 10 seconds of stereo at 44.1kHz
/// let original = SampleBuffer::new(44100, vec![vec![0.5; 441000]; 2])?;
///
/// // Trim from 5 seconds to 10 seconds
/// let params = TrimParams::new(5.0, 10.0)?;
/// let trimmed = trim_audio(&original, &params)?;
///
/// assert_eq!(trimmed.duration_seconds(), 5.0);
/// assert_eq!(trimmed.sample_rate(), 44100);
/// assert_eq!(trimmed.channel_count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn trim_audio(audio: &SampleBuffer, params: &TrimParams) -> Result<SampleBuffer> {
    params.validate()?;

    let duration = audio.duration_seconds();
    let start = params.start_seconds.clamp(0.0, duration);
    let end = params.end_seconds.clamp(start, duration);

    let (start_frame, end_frame) = frame_range(audio, start, end);

    if end_frame <= start_frame {
        return Err(AudioError::InvalidRange {
            start: params.start_seconds,
            end: params.end_seconds,
            duration,
        });
    }

    let channels = audio
        .channels()
        .iter()
        .map(|channel| channel[start_frame..end_frame].to_vec())
        .collect();

    Ok(audio.with_channels(channels))
}

/// Convert clamped times to frame indices, nearest frame
fn frame_range(audio: &SampleBuffer, start: f64, end: f64) -> (usize, usize) {
    let rate = audio.sample_rate() as f64;
    let frames = audio.frame_count();

    let to_frame = |seconds: f64| ((seconds * rate).round() as usize).min(frames);
    (to_frame(start), to_frame(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create test audio data
    fn create_test_audio(duration_seconds: f64, sample_rate: u32, channels: u16) -> SampleBuffer {
        let frames = (duration_seconds * sample_rate as f64) as usize;
        let planes = (0..channels)
            .map(|ch| (0..frames).map(|i| ((i + ch as usize) % 100) as f32 / 100.0).collect())
            .collect();
        SampleBuffer::new(sample_rate, planes).unwrap()
    }

    #[test]
    fn test_trim_middle_section() {
        let audio = create_test_audio(10.0, 44100, 2);

        // Trim from 3s to 7s (should give 4 seconds)
        let params = TrimParams::new(3.0, 7.0).unwrap();
        let trimmed = trim_audio(&audio, &params).unwrap();

        assert_eq!(trimmed.duration_seconds(), 4.0);
        assert_eq!(trimmed.channel(0).unwrap()[0], audio.channel(0).unwrap()[3 * 44100]);
        assert_eq!(trimmed.channel(1).unwrap()[0], audio.channel(1).unwrap()[3 * 44100]);
    }

    #[test]
    fn test_trim_identity() {
        let audio = create_test_audio(1.5, 22050, 1);

        let params = TrimParams::new(0.0, audio.duration_seconds()).unwrap();
        let trimmed = trim_audio(&audio, &params).unwrap();

        assert_eq!(trimmed, audio);
    }

    #[test]
    fn test_trim_clamps_out_of_bounds() {
        let audio = create_test_audio(10.0, 44100, 2);

        // End past the duration is clamped, negative start is clamped to zero
        let params = TrimParams::new(-2.0, 15.0).unwrap();
        let trimmed = trim_audio(&audio, &params).unwrap();

        assert_eq!(trimmed.frame_count(), audio.frame_count());
    }

    #[test]
    fn test_trim_empty_range_is_rejected() {
        let audio = create_test_audio(10.0, 44100, 2);

        let params = TrimParams::new(5.0, 5.0).unwrap();
        match trim_audio(&audio, &params) {
            Err(AudioError::InvalidRange { start, end, .. }) => {
                assert_eq!(start, 5.0);
                assert_eq!(end, 5.0);
            }
            other => panic!("Expected InvalidRange error, got {:?}", other),
        }
    }

    #[test]
    fn test_trim_boundary_rejected_on_short_audio() {
        // Both ends clamp to the 1 second duration
        let audio = create_test_audio(1.0, 8000, 1);
        let params = TrimParams::new(5.0, 5.0).unwrap();

        assert!(matches!(
            trim_audio(&audio, &params),
            Err(AudioError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_trim_reversed_range_is_rejected() {
        let audio = create_test_audio(2.0, 8000, 1);
        let params = TrimParams::new(1.5, 0.5).unwrap();

        assert!(matches!(
            trim_audio(&audio, &params),
            Err(AudioError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_trim_rounds_to_nearest_frame() {
        let audio = create_test_audio(1.0, 1000, 1);

        // 0.1004s -> frame 100, 0.2006s -> frame 201
        let params = TrimParams::new(0.1004, 0.2006).unwrap();
        let trimmed = trim_audio(&audio, &params).unwrap();

        assert_eq!(trimmed.frame_count(), 101);
        assert_eq!(trimmed.channel(0).unwrap()[0], audio.channel(0).unwrap()[100]);
    }

    #[test]
    fn test_trim_does_not_touch_input() {
        let audio = create_test_audio(1.0, 8000, 2);
        let before = audio.clone();

        let params = TrimParams::new(0.25, 0.5).unwrap();
        let _ = trim_audio(&audio, &params).unwrap();

        assert_eq!(audio, before);
    }

    #[test]
    fn test_trim_rejects_non_finite_params() {
        let audio = create_test_audio(1.0, 8000, 1);
        let params = TrimParams {
            start_seconds: f64::NAN,
            end_seconds: 0.5,
        };

        assert!(matches!(
            trim_audio(&audio, &params),
            Err(AudioError::InvalidParameter(_))
        ));
    }
}
