// src/audio/fade.rs

use serde::{Deserialize, Serialize};

use crate::audio::types::SampleBuffer;
use crate::error::{AudioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeDirection {
    /// Ramp 0 -> 1 from the first frame
    In,
    /// Ramp 1 -> 0 ending on the last frame
    Out,
}

impl FadeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FadeDirection::In => "in",
            FadeDirection::Out => "out",
        }
    }
}

/// Apply a linear fade over `min(duration_seconds, audio duration)`
///
/// Fade-in scales frame `i` of the ramp by `i / ramp_len`, so the first frame
/// is silent. Fade-out is the mirror image: the last frame is silent. Frames
/// outside the ramp are copied unchanged.
pub fn apply_fade(
    audio: &SampleBuffer,
    direction: FadeDirection,
    duration_seconds: f64,
) -> Result<SampleBuffer> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(AudioError::InvalidParameter(format!(
            "Fade duration must be a finite number >= 0, got {}",
            duration_seconds
        )));
    }

    let frames = audio.frame_count();
    let ramp_len = ((duration_seconds * audio.sample_rate() as f64).round() as usize).min(frames);

    let channels = audio
        .channels()
        .iter()
        .map(|channel| {
            channel
                .iter()
                .enumerate()
                .map(|(i, &s)| s * ramp_gain(i, frames, ramp_len, direction))
                .collect()
        })
        .collect();

    Ok(audio.with_channels(channels))
}

/// Gain at frame `index` for a ramp of `ramp_len` frames
fn ramp_gain(index: usize, frames: usize, ramp_len: usize, direction: FadeDirection) -> f32 {
    // Distance from the silent end of the ramp
    let position = match direction {
        FadeDirection::In => index,
        FadeDirection::Out => frames - 1 - index,
    };

    if position >= ramp_len {
        1.0
    } else {
        (position as f64 / ramp_len as f64) as f32
    }
}
