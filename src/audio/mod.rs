// src/audio/mod.rs

pub mod decoder;
pub mod edit;
pub mod encoder;
pub mod fade;
pub mod gain;
pub mod reverse;
pub mod speed;
pub mod trim;
pub mod types;
pub mod waveform;

// Re-export commonly used items
pub use decoder::{decode, decode_audio_file, decode_detailed, DecodedAudio};
pub use edit::{apply_edits, Edit};
pub use encoder::{encode_wav, to_pcm16, write_wav, WAV_HEADER_LEN};
pub use fade::{apply_fade, FadeDirection};
pub use gain::apply_gain;
pub use reverse::reverse_audio;
pub use speed::change_speed;
pub use trim::trim_audio;
pub use types::{AudioInfo, AudioSource, SampleBuffer, TrimParams, WaveformEnvelope};
pub use waveform::{extract_envelope, extract_envelope_from_source};
