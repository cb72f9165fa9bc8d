//! Async front end that tracks the currently selected source.
//!
//! Selecting a new source supersedes any decode still running for an older
//! one. Observers only ever see a [`Selection`] whose info, envelope and
//! samples all come from the same source.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::audio::{decode_detailed, extract_envelope, AudioInfo, AudioSource, Edit, SampleBuffer, WaveformEnvelope};
use crate::config::EngineConfig;
use crate::error::{AudioError, Result};
use crate::export::{run_blocking, ExportedAudio, Exporter};
use crate::generation::{Completion, Generation, GenerationCounter};

/// Everything the UI needs about the selected source
#[derive(Debug, Clone)]
pub struct Selection {
    pub generation: u64,
    pub name: Option<String>,
    pub info: AudioInfo,
    pub envelope: WaveformEnvelope,
    stem: Option<String>,
    audio: Arc<SampleBuffer>,
}

impl Selection {
    pub fn audio(&self) -> &SampleBuffer {
        &self.audio
    }

    fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }
}

pub struct Editor {
    exporter: Exporter,
    generations: GenerationCounter,
    current: Mutex<Option<Selection>>,
}

impl Editor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            exporter: Exporter::new(config),
            generations: GenerationCounter::new(),
            current: Mutex::new(None),
        }
    }

    /// The committed selection, if the latest load succeeded
    pub fn current(&self) -> Option<Selection> {
        self.lock().clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generations.latest()
    }

    /// Decode `source` and make it the current selection
    pub async fn select(&self, source: AudioSource) -> Result<Completion<Selection>> {
        let generation = self.begin_selection();
        self.load(generation, source).await
    }

    /// Start a new selection, invalidating every load still in flight
    ///
    /// The previous selection is cleared right away so nothing from it is
    /// shown next to the new source.
    pub fn begin_selection(&self) -> Generation {
        let mut current = self.lock();
        *current = None;
        self.generations.advance()
    }

    /// Decode and analyse a source for `generation`
    ///
    /// Results and errors of a superseded generation are dropped and
    /// reported as [`Completion::Superseded`].
    pub async fn load(
        &self,
        generation: Generation,
        source: AudioSource,
    ) -> Result<Completion<Selection>> {
        let name = source.name().map(str::to_string);
        let stem = source.stem().map(str::to_string);
        let decoded = run_blocking(move || decode_detailed(&source)).await;

        if !generation.is_current() {
            tracing::debug!(generation = generation.id(), "discarding superseded decode");
            return Ok(Completion::Superseded);
        }

        let decoded = decoded?;
        let info = decoded.info();
        let audio = Arc::new(decoded.buffer);

        let buckets = self.exporter.config().waveform_buckets;
        let envelope_audio = Arc::clone(&audio);
        let envelope = run_blocking(move || extract_envelope(&envelope_audio, buckets))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Waveform extraction failed, showing empty waveform: {}", e);
                WaveformEnvelope::default()
            });

        let selection = Selection {
            generation: generation.id(),
            name,
            info,
            envelope,
            stem,
            audio,
        };

        Ok(self.commit(&generation, selection))
    }

    /// Edit and encode the current selection
    ///
    /// Superseded if a different source is selected before encoding ends.
    pub async fn export(&self, edits: Vec<Edit>) -> Result<Completion<ExportedAudio>> {
        let selection = self
            .current()
            .ok_or_else(|| AudioError::InvalidParameter("No audio selected".to_string()))?;

        let exporter = self.exporter.clone();
        let generation = selection.generation;
        let exported = run_blocking(move || {
            exporter.export_buffer(selection.audio(), selection.stem(), &edits)
        })
        .await;

        self.finish_export(generation, exported)
    }

    /// Join point of an export: a superseded export yields neither its
    /// bytes nor its error
    fn finish_export(
        &self,
        generation: u64,
        exported: Result<ExportedAudio>,
    ) -> Result<Completion<ExportedAudio>> {
        if self.generations.latest() != generation {
            tracing::debug!(generation, "discarding export of superseded selection");
            return Ok(Completion::Superseded);
        }

        exported.map(Completion::Current)
    }

    fn commit(&self, generation: &Generation, selection: Selection) -> Completion<Selection> {
        // begin_selection() advances under the same lock, so no newer
        // selection can start between this check and the store.
        let mut current = self.lock();
        let completion = generation.complete(selection);

        if let Completion::Current(selection) = &completion {
            *current = Some(selection.clone());
        }

        completion
    }

    fn lock(&self) -> MutexGuard<'_, Option<Selection>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::encode_wav;

    fn wav_source(seconds: f64, name: &str) -> AudioSource {
        let frames = (seconds * 8000.0) as usize;
        let plane: Vec<f32> = (0..frames).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let audio = SampleBuffer::new(8000, vec![plane]).unwrap();
        AudioSource::new(encode_wav(&audio).unwrap()).with_name(name)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_select_commits_selection() {
        let editor = Editor::default();

        let selection = editor
            .select(wav_source(1.0, "first.wav"))
            .await
            .unwrap()
            .into_current()
            .expect("latest selection should be current");

        assert_eq!(selection.generation, 1);
        assert_eq!(selection.name.as_deref(), Some("first.wav"));
        assert_eq!(selection.info.frame_count, 8000);
        assert_eq!(selection.envelope.len(), 100);
        assert_eq!(editor.current().unwrap().generation, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_load_is_discarded() {
        let editor = Editor::default();

        let stale = editor.begin_selection();
        let fresh = editor.begin_selection();

        // Newer selection finishes first, then the older one completes
        let fresh_result = editor.load(fresh, wav_source(0.5, "new.wav")).await.unwrap();
        let stale_result = editor.load(stale, wav_source(2.0, "old.wav")).await.unwrap();

        assert!(!fresh_result.is_superseded());
        assert!(stale_result.is_superseded());
        assert_eq!(editor.current().unwrap().name.as_deref(), Some("new.wav"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_errors_are_swallowed() {
        let editor = Editor::default();

        let stale = editor.begin_selection();
        let _fresh = editor.begin_selection();

        let result = editor.load(stale, AudioSource::new(Vec::new())).await;
        assert!(matches!(result, Ok(Completion::Superseded)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_current_errors_surface_and_clear_state() {
        let editor = Editor::default();
        editor.select(wav_source(0.5, "good.wav")).await.unwrap();
        assert!(editor.current().is_some());

        let result = editor.select(AudioSource::new(b"nope".to_vec())).await;

        assert!(result.unwrap_err().is_decode_error());
        assert!(editor.current().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_selects_keep_only_latest() {
        let editor = Arc::new(Editor::default());

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let editor = Arc::clone(&editor);
                let source = wav_source(0.25 * (i + 1) as f64, &format!("take{}.wav", i));
                let generation = editor.begin_selection();
                tokio::spawn(async move { editor.load(generation, source).await })
            })
            .collect();

        let mut current = 0;
        for handle in handles {
            if let Completion::Current(selection) = handle.await.unwrap().unwrap() {
                current += 1;
                assert_eq!(selection.generation, 6);
            }
        }

        assert_eq!(current, 1);
        assert_eq!(editor.current().unwrap().name.as_deref(), Some("take5.wav"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_current_selection() {
        let editor = Editor::default();
        editor.select(wav_source(1.0, "voice.wav")).await.unwrap();

        let exported = editor
            .export(vec![Edit::Trim {
                start_seconds: 0.25,
                end_seconds: 0.75,
            }])
            .await
            .unwrap()
            .into_current()
            .unwrap();

        assert_eq!(exported.file_name, "voice_trimmed.wav");
        assert!((exported.duration_seconds - 0.5).abs() < 1e-9);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_failure_surfaces_while_current() {
        let editor = Editor::default();
        editor.select(wav_source(1.0, "clip.wav")).await.unwrap();

        let result = editor
            .export(vec![Edit::Trim {
                start_seconds: 1e9,
                end_seconds: 1e9,
            }])
            .await;

        assert!(matches!(result, Err(AudioError::InvalidRange { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_superseded_export_drops_its_error() {
        let editor = Editor::default();
        let selection = editor
            .select(wav_source(1.0, "clip.wav"))
            .await
            .unwrap()
            .into_current()
            .unwrap();

        let exported = editor.exporter.export_buffer(
            selection.audio(),
            selection.stem(),
            &[Edit::Trim {
                start_seconds: 1e9,
                end_seconds: 1e9,
            }],
        );
        assert!(exported.is_err());

        // A new source is picked before the failed export reaches its join point
        editor.begin_selection();

        let result = editor.finish_export(selection.generation, exported);
        assert!(matches!(result, Ok(Completion::Superseded)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_superseded_export_drops_its_bytes() {
        let editor = Editor::default();
        let selection = editor
            .select(wav_source(1.0, "clip.wav"))
            .await
            .unwrap()
            .into_current()
            .unwrap();

        let exported = editor
            .exporter
            .export_buffer(selection.audio(), selection.stem(), &[Edit::Reverse]);
        editor.begin_selection();

        let result = editor.finish_export(selection.generation, exported).unwrap();
        assert!(result.is_superseded());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_export_without_selection() {
        let editor = Editor::default();
        assert!(matches!(
            editor.export(vec![Edit::Reverse]).await,
            Err(AudioError::InvalidParameter(_))
        ));
    }
}
