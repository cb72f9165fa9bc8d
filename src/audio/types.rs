use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{AudioError, Result};

/// Decoded audio held in memory as planar PCM samples
///
/// Each channel is its own `Vec<f32>` of normalized samples, nominally in
/// [-1.0, 1.0]. Values outside that range are kept as-is: clipping only
/// happens when the buffer is encoded to 16-bit WAV.
///
/// Buffers are never edited in place. Every operator reads a buffer and
/// returns a new one, so an "original" and its edited copy can coexist.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors
    ///
    /// Fails when there are no channels, when channel lengths differ, or
    /// when the sample rate is zero.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidParameter(
                "Sample rate must be greater than 0".to_string(),
            ));
        }

        let Some(first) = channels.first() else {
            return Err(AudioError::InvalidParameter(
                "Audio must have at least one channel".to_string(),
            ));
        };

        let frame_count = first.len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frame_count)
        {
            return Err(AudioError::InvalidParameter(format!(
                "Channel {} has {} frames, expected {}",
                index,
                channel.len(),
                frame_count
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer from interleaved samples: [L, R, L, R, ...]
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: u16, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(AudioError::InvalidParameter(
                "Audio must have at least one channel".to_string(),
            ));
        }

        let channel_count = channel_count as usize;
        let frame_count = samples.len() / channel_count;
        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(frame_count))
            .collect();

        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    /// A buffer of digital silence
    pub fn silent(sample_rate: u32, channel_count: u16, frame_count: usize) -> Result<Self> {
        Self::new(sample_rate, vec![vec![0.0; frame_count]; channel_count as usize])
    }

    /// New buffer at the same sample rate with different channel data
    ///
    /// Operators call this with channels they derived from `self`, which
    /// keeps the channel count and equal-length invariant intact.
    pub(crate) fn with_channels(&self, channels: Vec<Vec<f32>>) -> Self {
        debug_assert_eq!(channels.len(), self.channels.len());
        debug_assert!(channels.windows(2).all(|w| w[0].len() == w[1].len()));

        Self {
            sample_rate: self.sample_rate,
            channels,
        }
    }

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Get the number of audio frames (one sample per channel)
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Total duration in seconds, always derived from the frame count
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

/// Summary of a decoded source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Total duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u16,

    /// Frames per channel
    pub frame_count: usize,

    /// Codec short name as reported by symphonia (e.g., "mp3", "flac", "pcm_s16le")
    pub format: String,

    /// Bit depth if available (e.g., 16, 24)
    pub bit_depth: Option<u16>,
}

/// Parameters for trimming audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimParams {
    /// Start time in seconds, clamped to the audio when applied
    pub start_seconds: f64,

    /// End time in seconds, clamped to [start, duration] when applied
    pub end_seconds: f64,
}

impl TrimParams {
    /// Create new trim parameters
    ///
    /// Out-of-range times are accepted and clamped later against the actual
    /// audio; only non-finite values are rejected here.
    pub fn new(start_seconds: f64, end_seconds: f64) -> Result<Self> {
        let params = Self {
            start_seconds,
            end_seconds,
        };
        params.validate()?;
        Ok(params)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.start_seconds.is_finite() || !self.end_seconds.is_finite() {
            return Err(AudioError::InvalidParameter(format!(
                "Trim times must be finite numbers: {} to {}",
                self.start_seconds, self.end_seconds
            )));
        }
        Ok(())
    }

    /// Get the requested duration, before clamping
    pub fn trim_duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Peak magnitudes for drawing a waveform, one value per bucket in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformEnvelope {
    pub peaks: Vec<f32>,
}

impl WaveformEnvelope {
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Encoded audio bytes plus an optional file name
///
/// The name is only used as a format hint for the decoder and to derive
/// export file names. Bytes are shared, so cloning a source is cheap.
#[derive(Debug, Clone)]
pub struct AudioSource {
    bytes: Arc<[u8]>,
    name: Option<String>,
}

impl AudioSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read a whole file into memory, keeping its file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| AudioError::FileOpen {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let source = Self::new(bytes);
        Ok(match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => source.with_name(name),
            None => source,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Extension of the name, if any
    pub fn extension(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
    }

    /// File name without extension
    pub fn stem(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|n| Path::new(n).file_stem())
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
