use thiserror::Error;

/// Top-level error for sampling, encoding and song rendering.
#[derive(Debug, Error)]
pub enum ToneGenError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    #[error("failed to write WAV stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown note '{0}'")]
    UnknownNote(String),
    #[error("failed to parse song: {0}")]
    Song(#[from] serde_json::Error),
}

/// A caller-supplied value outside what the sampler or encoder accepts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("volume {0} must be within 0.0..=1.0 (or 11 for loudest)")]
    Volume(f64),
    #[error("envelope duration {0}s must be greater than zero")]
    EnvelopeDuration(f64),
    #[error("unsupported channel count {0}: only 1 channel (mono) supported")]
    Channels(u16),
    #[error("unsupported bits per sample {0}: only 8 bits supported")]
    BitsPerSample(u16),
    #[error("sample rate {0} Hz must be positive")]
    SampleRate(u32),
    #[error("note duration {0}s must be finite, non-negative and fit in one WAV file")]
    Duration(f64),
    #[error("tone frequency {0} Hz must be positive")]
    Frequency(u32),
    #[error("{0} bytes of sample data exceed the 32-bit RIFF size fields")]
    DataTooLarge(usize),
}
