// src/audio/encoder.rs

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;

use crate::audio::types::SampleBuffer;
use crate::error::{AudioError, Result};

/// Size of a RIFF header with a plain 16-byte PCM `fmt ` chunk (mono and stereo)
///
/// Layouts with more than two channels get a WAVEFORMATEXTENSIBLE `fmt `
/// chunk from hound, which adds 24 bytes.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;

/// Largest `data` chunk a RIFF size field can describe
pub(crate) const MAX_DATA_BYTES: usize = u32::MAX as usize - WAV_HEADER_LEN;

/// Bytes one frame takes in the encoded `data` chunk
pub(crate) fn frame_bytes(channel_count: usize) -> usize {
    channel_count * (BITS_PER_SAMPLE as usize / 8)
}

/// Encode PCM audio data to an in-memory WAV file
///
/// Outputs 16-bit signed PCM at the buffer's own sample rate and channel
/// count, interleaved frame by frame. Samples outside [-1.0, 1.0] are
/// clipped here and nowhere else.
///
/// Mono and stereo get the canonical 44-byte header with format tag 1
/// (PCM). With more than two channels hound writes a WAVE_FORMAT_EXTENSIBLE
/// `fmt ` chunk instead (tag 0xFFFE, PCM subformat, 68-byte header), which
/// is the RIFF form that carries a channel mask.
///
/// # Example
/// ```
/// use wavesmith_lib::audio::{encode_wav, SampleBuffer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let audio = SampleBuffer::new(44100, vec![vec![0.0, 0.5, -0.5, 1.0, -1.0]])?;
/// let wav = encode_wav(&audio)?;
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(wav.len(), 44 + 5 * 2);
/// # Ok(())
/// # }
/// ```
pub fn encode_wav(audio: &SampleBuffer) -> Result<Vec<u8>> {
    let channels = u16::try_from(audio.channel_count()).map_err(|_| {
        AudioError::EncodeFailed(format!("Too many channels: {}", audio.channel_count()))
    })?;

    let data_len = audio.frame_count() * frame_bytes(audio.channel_count());
    if data_len > MAX_DATA_BYTES {
        return Err(AudioError::EncodeFailed(format!(
            "Audio too long for a WAV file: {} bytes of sample data",
            data_len
        )));
    }

    let spec = WavSpec {
        channels,
        sample_rate: audio.sample_rate(),
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + data_len));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;

        // Interleave: frame 0 of every channel, then frame 1, ...
        for frame in 0..audio.frame_count() {
            for channel in audio.channels() {
                writer.write_sample(to_pcm16(channel[frame]))?;
            }
        }

        // Finalize patches the RIFF and data chunk sizes
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Encode and write a WAV file to disk
pub fn write_wav<P: AsRef<Path>>(audio: &SampleBuffer, output_path: P) -> Result<()> {
    let bytes = encode_wav(audio)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}

/// Scale to 16-bit and clip; NaN maps to silence
pub fn to_pcm16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
