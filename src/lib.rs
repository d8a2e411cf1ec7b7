pub mod dsp;
pub mod error;
pub mod notes;
pub mod song;

use crate::error::ToneGenError;
use crate::song::Song;

pub use crate::dsp::envelope::{Envelope, EnvelopeShape};
pub use crate::dsp::oscillator::Waveform;
pub use crate::dsp::sampler::{RenderConfig, Sampler};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a song and encode it as a complete WAV file in memory.
pub fn render_song_wav(song: &Song) -> Result<Vec<u8>, ToneGenError> {
    let sampler = song.render()?;
    dsp::wav::encode_wav(&sampler)
}
