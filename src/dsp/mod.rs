//! DSP — waveform synthesis, amplitude shaping, sampling and WAV export.
//!
//! Signal flows one way: an [`oscillator::Waveform`] and an
//! [`envelope::Envelope`] feed a [`sampler::Sampler`], whose buffer is
//! serialized by [`wav`].

pub mod envelope;
pub mod oscillator;
pub mod sampler;
pub mod wav;
