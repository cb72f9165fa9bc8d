// src/audio/edit.rs

use serde::{Deserialize, Serialize};

use crate::audio::fade::{apply_fade, FadeDirection};
use crate::audio::gain::apply_gain;
use crate::audio::reverse::reverse_audio;
use crate::audio::speed::change_speed;
use crate::audio::trim::trim_audio;
use crate::audio::types::{SampleBuffer, TrimParams};
use crate::error::Result;

/// One editing step, serializable so edit lists can come from JSON
///
/// ```json
/// [
///   { "op": "trim", "start_seconds": 1.0, "end_seconds": 4.5 },
///   { "op": "fade", "direction": "out", "duration_seconds": 0.5 },
///   { "op": "gain", "factor": 1.5 }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Edit {
    Trim {
        start_seconds: f64,
        end_seconds: f64,
    },
    Gain {
        factor: f32,
    },
    Fade {
        direction: FadeDirection,
        duration_seconds: f64,
    },
    Reverse,
    Speed {
        factor: f64,
    },
}

impl Edit {
    /// Run this step on `audio`, returning a new buffer
    pub fn apply(&self, audio: &SampleBuffer) -> Result<SampleBuffer> {
        match *self {
            Edit::Trim {
                start_seconds,
                end_seconds,
            } => trim_audio(audio, &TrimParams::new(start_seconds, end_seconds)?),
            Edit::Gain { factor } => apply_gain(audio, factor),
            Edit::Fade {
                direction,
                duration_seconds,
            } => apply_fade(audio, direction, duration_seconds),
            Edit::Reverse => Ok(reverse_audio(audio)),
            Edit::Speed { factor } => change_speed(audio, factor),
        }
    }

    /// Suffix used in export file names
    pub fn label(&self) -> &'static str {
        match self {
            Edit::Trim { .. } => "trimmed",
            Edit::Gain { .. } => "volume",
            Edit::Fade {
                direction: FadeDirection::In,
                ..
            } => "fade_in",
            Edit::Fade {
                direction: FadeDirection::Out,
                ..
            } => "fade_out",
            Edit::Reverse => "reversed",
            Edit::Speed { .. } => "speed",
        }
    }
}

/// Apply edits left to right, each step reading the previous step's output
///
/// Intermediate buffers are dropped as soon as the next step has run. An
/// empty list returns a copy of the input.
pub fn apply_edits(audio: &SampleBuffer, edits: &[Edit]) -> Result<SampleBuffer> {
    let Some((first, rest)) = edits.split_first() else {
        return Ok(audio.clone());
    };

    let mut current = first.apply(audio)?;
    for edit in rest {
        current = edit.apply(&current)?;
    }

    Ok(current)
}
