// src/audio/reverse.rs

use crate::audio::types::SampleBuffer;

/// Reverse frame order, the same permutation for every channel
pub fn reverse_audio(audio: &SampleBuffer) -> SampleBuffer {
    let channels = audio
        .channels()
        .iter()
        .map(|channel| channel.iter().rev().copied().collect())
        .collect();

    audio.with_channels(channels)
}
