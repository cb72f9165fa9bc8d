//! Public operations: decode -> edit(s) -> encode.
//!
//! Each operation takes an [`AudioSource`] and returns the edited audio as
//! 16-bit PCM WAV bytes together with a suggested file name.

use serde::Serialize;

use crate::audio::{
    apply_edits, decode, decode_detailed, encode_wav, extract_envelope, AudioInfo, AudioSource,
    Edit, FadeDirection, SampleBuffer,
};
use crate::config::EngineConfig;
use crate::error::{AudioError, Result};

/// Stem used when the source has no file name
const FALLBACK_STEM: &str = "audio";

/// WAV bytes ready to be saved or handed to a player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedAudio {
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Suggested name, e.g. `interview_trimmed.wav`
    pub file_name: String,

    pub duration_seconds: f64,
}

/// Runs the decode -> edit -> encode operations with one configuration
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: EngineConfig,
}

impl Exporter {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode and discard, keeping only the stream summary
    pub fn audio_info(&self, source: &AudioSource) -> Result<AudioInfo> {
        decode_detailed(source).map(|decoded| decoded.info())
    }

    /// Peak envelope of a source; `None` uses the configured bucket count
    pub fn waveform(&self, source: &AudioSource, buckets: Option<usize>) -> Result<Vec<f32>> {
        let buckets = buckets.unwrap_or(self.config.waveform_buckets);
        let audio = decode(source)?;
        Ok(extract_envelope(&audio, buckets)?.peaks)
    }

    pub fn trim(
        &self,
        source: &AudioSource,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Result<ExportedAudio> {
        self.process(
            source,
            &[Edit::Trim {
                start_seconds,
                end_seconds,
            }],
        )
    }

    pub fn adjust_volume(&self, source: &AudioSource, factor: f32) -> Result<ExportedAudio> {
        self.process(source, &[Edit::Gain { factor }])
    }

    pub fn fade(
        &self,
        source: &AudioSource,
        direction: FadeDirection,
        duration_seconds: f64,
    ) -> Result<ExportedAudio> {
        self.process(
            source,
            &[Edit::Fade {
                direction,
                duration_seconds,
            }],
        )
    }

    pub fn reverse(&self, source: &AudioSource) -> Result<ExportedAudio> {
        self.process(source, &[Edit::Reverse])
    }

    pub fn change_speed(&self, source: &AudioSource, factor: f64) -> Result<ExportedAudio> {
        self.process(source, &[Edit::Speed { factor }])
    }

    /// Decode a source, run the edits in order and encode the result
    pub fn process(&self, source: &AudioSource, edits: &[Edit]) -> Result<ExportedAudio> {
        let audio = decode(source)?;
        self.export_buffer(&audio, source.stem(), edits)
    }

    /// Edit and encode audio that is already decoded
    pub fn export_buffer(
        &self,
        audio: &SampleBuffer,
        stem: Option<&str>,
        edits: &[Edit],
    ) -> Result<ExportedAudio> {
        let edited = apply_edits(audio, edits)?;
        let bytes = encode_wav(&edited)?;
        let file_name = self.file_name(stem, edits);

        tracing::info!(
            file_name = %file_name,
            edits = edits.len(),
            frames = edited.frame_count(),
            bytes = bytes.len(),
            "exported audio"
        );

        Ok(ExportedAudio {
            bytes,
            file_name,
            duration_seconds: edited.duration_seconds(),
        })
    }

    /// Run [`Exporter::process`] on the blocking thread pool
    pub async fn process_in_background(
        &self,
        source: AudioSource,
        edits: Vec<Edit>,
    ) -> Result<ExportedAudio> {
        let exporter = self.clone();
        run_blocking(move || exporter.process(&source, &edits)).await
    }

    /// `<stem><sep><label>[<sep><label>...].wav`
    pub fn file_name(&self, stem: Option<&str>, edits: &[Edit]) -> String {
        let separator = &self.config.output_suffix_separator;
        let mut name = stem.unwrap_or(FALLBACK_STEM).to_string();

        if edits.is_empty() {
            name.push_str(separator);
            name.push_str("converted");
        }
        for edit in edits {
            name.push_str(separator);
            name.push_str(edit.label());
        }

        name.push_str(".wav");
        name
    }
}

/// Run CPU-bound work on tokio's blocking pool and flatten join errors
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AudioError::Task(format!("Task join error: {}", e)))?
}
