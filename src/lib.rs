pub mod audio;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod generation;

// Re-export for convenience
pub use audio::*;
pub use config::EngineConfig;
pub use editor::{Editor, Selection};
pub use error::{AudioError, Result};
pub use export::{ExportedAudio, Exporter};
pub use generation::{Completion, Generation, GenerationCounter};
