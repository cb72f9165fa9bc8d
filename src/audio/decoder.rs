// src/audio/decoder.rs

use std::io::{Cursor, ErrorKind};
use std::path::Path;
use symphonia::core::audio::AudioBufferRef;
use symphonia::core::codecs::{CodecParameters, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::types::{AudioInfo, AudioSource, SampleBuffer};
use crate::error::{AudioError, Result};

/// A decoded buffer together with what symphonia reported about the stream
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub buffer: SampleBuffer,

    /// Codec short name (e.g., "mp3", "flac", "pcm_s16le")
    pub format: String,

    pub bit_depth: Option<u16>,
}

impl DecodedAudio {
    pub fn info(&self) -> AudioInfo {
        AudioInfo {
            duration_seconds: self.buffer.duration_seconds(),
            sample_rate: self.buffer.sample_rate(),
            channels: self.buffer.channel_count() as u16,
            frame_count: self.buffer.frame_count(),
            format: self.format.clone(),
            bit_depth: self.bit_depth,
        }
    }
}

/// Decodes an in-memory audio source to planar PCM samples
///
/// Supports: MP3, FLAC, WAV, OGG Vorbis, AAC/M4A, WebM and more via symphonia
///
/// # Example
/// ```no_run
/// use wavesmith_lib::audio::{decode, AudioSource};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = AudioSource::from_path("loop.flac")?;
/// let audio = decode(&source)?;
/// println!("Loaded {} seconds of audio", audio.duration_seconds());
/// println!("Sample rate: {} Hz", audio.sample_rate());
/// println!("Channels: {}", audio.channel_count());
/// # Ok(())
/// # }
/// ```
pub fn decode(source: &AudioSource) -> Result<SampleBuffer> {
    decode_detailed(source).map(|decoded| decoded.buffer)
}

/// Read and decode an audio file from disk
pub fn decode_audio_file<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
    decode(&AudioSource::from_path(path)?)
}

/// Decode a source and keep the codec details alongside the samples
pub fn decode_detailed(source: &AudioSource) -> Result<DecodedAudio> {
    if source.is_empty() {
        return Err(AudioError::EmptyInput);
    }

    // Create a media source stream over the shared bytes
    let cursor = Cursor::new(source.shared_bytes());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    // Create a hint to help symphonia detect the format
    let mut hint = Hint::new();
    if let Some(extension) = source.extension() {
        hint.with_extension(extension);
    }

    // Probe the media source to detect format
    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(msg) => AudioError::UnsupportedFormat(msg.to_string()),
            other => AudioError::DecodeFailed(format!("Failed to probe format: {}", other)),
        })?;

    let mut format = probed.format;

    // Find the default audio track (skip video/subtitle tracks)
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::UnsupportedFormat("No audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    // Create decoder for this track
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(msg) => {
                AudioError::UnsupportedFormat(format!("No decoder for codec: {}", msg))
            }
            other => AudioError::DecodeFailed(format!("Failed to create decoder: {}", other)),
        })?;

    // Channel layout may be missing from the container (some MP3s), so the
    // planes are allocated from the first decoded packet instead.
    let mut channels: Option<Vec<Vec<f32>>> = None;
    let mut sample_rate = codec_params.sample_rate;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => {
                return Err(AudioError::DecodeFailed(format!(
                    "Failed to read packet: {}",
                    e
                )))
            }
        };

        // Skip packets from other tracks (e.g., video, album art)
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AudioError::DecodeFailed(format!("Decode error: {}", e)))?;

        let spec = *decoded.spec();
        let planes = channels.get_or_insert_with(|| vec![Vec::new(); spec.channels.count()]);

        if planes.len() != spec.channels.count() {
            return Err(AudioError::DecodeFailed(format!(
                "Channel count changed mid-stream from {} to {}",
                planes.len(),
                spec.channels.count()
            )));
        }

        sample_rate.get_or_insert(spec.rate);
        append_planes(&decoded, planes);
    }

    let channels = match channels {
        Some(channels) => channels,
        None => empty_planes(&codec_params)?,
    };

    let sample_rate = sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| AudioError::DecodeFailed("Sample rate not found".to_string()))?;

    let buffer = SampleBuffer::new(sample_rate, channels)
        .map_err(|e| AudioError::DecodeFailed(e.to_string()))?;

    let format = symphonia::default::get_codecs()
        .get_codec(codec_params.codec)
        .map(|descriptor| descriptor.short_name.to_string())
        .unwrap_or_else(|| format!("{:?}", codec_params.codec));

    tracing::debug!(
        frames = buffer.frame_count(),
        channels = buffer.channel_count(),
        sample_rate = buffer.sample_rate(),
        format = %format,
        "decoded audio"
    );

    Ok(DecodedAudio {
        buffer,
        format,
        bit_depth: codec_params.bits_per_sample.map(|b| b as u16),
    })
}

/// Planes for a stream that produced no packets at all
fn empty_planes(codec_params: &CodecParameters) -> Result<Vec<Vec<f32>>> {
    let count = codec_params
        .channels
        .map(|c| c.count())
        .filter(|&count| count > 0)
        .ok_or_else(|| AudioError::DecodeFailed("No audio frames decoded".to_string()))?;

    Ok(vec![Vec::new(); count])
}

/// Append a decoded packet to the per-channel sample vectors
///
/// Handles all sample formats and converts them to f32 in [-1.0, 1.0]
fn append_planes(buffer: &AudioBufferRef, channels: &mut [Vec<f32>]) {
    match buffer {
        // Already f32 - just copy
        AudioBufferRef::F32(buf) => extend_planes(buf.planes().planes(), channels, |&s| s),
        AudioBufferRef::F64(buf) => extend_planes(buf.planes().planes(), channels, |&s| s as f32),

        // Signed integers
        AudioBufferRef::S8(buf) => {
            extend_planes(buf.planes().planes(), channels, |&s| s as f32 / 128.0)
        }
        AudioBufferRef::S16(buf) => {
            extend_planes(buf.planes().planes(), channels, |&s| s as f32 / 32768.0)
        }
        AudioBufferRef::S24(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            s.inner() as f32 / 8388608.0
        }),
        AudioBufferRef::S32(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            (s as f64 / 2147483648.0) as f32
        }),

        // Unsigned integers are offset binary
        AudioBufferRef::U8(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            (s as f32 - 128.0) / 128.0
        }),
        AudioBufferRef::U16(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            (s as f32 - 32768.0) / 32768.0
        }),
        AudioBufferRef::U24(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            (s.inner() as f32 - 8388608.0) / 8388608.0
        }),
        AudioBufferRef::U32(buf) => extend_planes(buf.planes().planes(), channels, |&s| {
            ((s as f64 - 2147483648.0) / 2147483648.0) as f32
        }),
    }
}

fn extend_planes<T, F>(planes: &[&[T]], channels: &mut [Vec<f32>], convert: F)
where
    F: Fn(&T) -> f32,
{
    for (plane, channel) in planes.iter().zip(channels.iter_mut()) {
        channel.extend(plane.iter().map(&convert));
    }
}
