// src/audio/waveform.rs

use crate::audio::decoder::decode;
use crate::audio::types::{AudioSource, SampleBuffer, WaveformEnvelope};
use crate::error::{AudioError, Result};

/// Extract a peak envelope from decoded audio for visualization
///
/// Frames are split into `buckets` contiguous windows, window `i` covering
/// `floor(i * frames / buckets)..floor((i + 1) * frames / buckets)`. Each
/// slot holds the largest absolute sample across all channels in its
/// window, capped at 1.0. Windows with no frames (only possible when there
/// are fewer frames than buckets) hold 0.
///
/// # Example
/// ```
/// use wavesmith_lib::audio::{extract_envelope, SampleBuffer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let audio = SampleBuffer::new(8000, vec![vec![0.1, -0.9, 0.3, 0.2]])?;
/// let envelope = extract_envelope(&audio, 2)?;
/// assert_eq!(envelope.peaks, vec![0.9, 0.3]);
/// # Ok(())
/// # }
/// ```
pub fn extract_envelope(audio: &SampleBuffer, buckets: usize) -> Result<WaveformEnvelope> {
    if buckets == 0 {
        return Err(AudioError::InvalidParameter(
            "Bucket count must be greater than 0".to_string(),
        ));
    }

    let frames = audio.frame_count();
    let boundary = |i: usize| (i as u128 * frames as u128 / buckets as u128) as usize;

    let peaks = (0..buckets)
        .map(|i| {
            let window = boundary(i)..boundary(i + 1);
            audio
                .channels()
                .iter()
                .flat_map(|channel| channel[window.clone()].iter())
                .fold(0.0f32, |peak, &s| peak.max(s.abs()))
                .min(1.0)
        })
        .collect();

    Ok(WaveformEnvelope { peaks })
}

/// Decode a source and extract its envelope in one step
///
/// Used to preview a file before any edit is applied.
pub fn extract_envelope_from_source(
    source: &AudioSource,
    buckets: usize,
) -> Result<WaveformEnvelope> {
    if buckets == 0 {
        return Err(AudioError::InvalidParameter(
            "Bucket count must be greater than 0".to_string(),
        ));
    }

    let audio = decode(source)?;
    extract_envelope(&audio, buckets)
}
