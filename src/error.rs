use thiserror::Error;

/// All possible errors that can occur while decoding, editing or exporting audio
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to open or read the audio file from disk
    #[error("Failed to open audio file '{path}': {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },

    /// The input contained no bytes at all
    #[error("Input audio is empty")]
    EmptyInput,

    /// The container or codec is not recognized by symphonia
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The container was recognized but the data is corrupt or truncated
    #[error("Audio decoding failed: {0}")]
    DecodeFailed(String),

    /// Error occurred while encoding to WAV
    #[error("WAV encoding failed: {0}")]
    EncodeFailed(String),

    /// Trim range collapses to zero frames after clamping
    #[error("Invalid range ({start}s to {end}s) for audio of {duration}s")]
    InvalidRange {
        start: f64,
        end: f64,
        duration: f64,
    },

    /// An operator precondition was violated (negative gain, zero speed, ...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be loaded or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A background worker panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from hound WAV encoder
    #[error("Hound WAV error: {0}")]
    Hound(#[from] hound::Error),
}

impl AudioError {
    /// True for errors caused by the input file rather than the caller's parameters
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            AudioError::EmptyInput | AudioError::UnsupportedFormat(_) | AudioError::DecodeFailed(_)
        )
    }
}

/// Convenient Result type that uses our AudioError
pub type Result<T> = std::result::Result<T, AudioError>;
