//! Sampler — discretizes generator × envelope × volume into PCM bytes.
//!
//! The sampler owns the output format and a growing buffer of quantized
//! samples. Each [`Sampler::sample`] call appends one note, so a whole song
//! accumulates into one continuous buffer that the WAV encoder reads at the
//! end.

use serde::{Deserialize, Serialize};

use super::envelope::Envelope;
use super::oscillator::Waveform;
use super::wav::MAX_DATA_BYTES;
use crate::error::InvalidArgument;

/// Volume alias that maps to full scale ("these go to eleven").
pub const LOUDEST: f64 = 11.0;

/// Output format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Samples per second.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Bits per stored sample. Only 8 is supported.
    #[serde(default = "default_bits_per_sample")]
    pub bits_per_sample: u16,
    /// Interleaved channels. Only mono is supported.
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_bits_per_sample() -> u16 {
    8
}

fn default_channels() -> u16 {
    1
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            sample_rate: default_sample_rate(),
            bits_per_sample: default_bits_per_sample(),
            channels: default_channels(),
        }
    }
}

/// Accumulates 8-bit unsigned mono PCM.
///
/// Not synchronized: concurrent `sample` calls on one instance need
/// external locking. The format fields are fixed at construction.
#[derive(Debug, Clone)]
pub struct Sampler {
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
    data: Vec<u8>,
}

impl Sampler {
    pub fn new(
        sample_rate: u32,
        bits_per_sample: u16,
        channels: u16,
    ) -> Result<Self, InvalidArgument> {
        if channels != 1 {
            return Err(InvalidArgument::Channels(channels));
        }
        if bits_per_sample != 8 {
            return Err(InvalidArgument::BitsPerSample(bits_per_sample));
        }
        if sample_rate == 0 {
            return Err(InvalidArgument::SampleRate(sample_rate));
        }
        Ok(Sampler {
            sample_rate,
            bits_per_sample,
            channels,
            data: Vec::new(),
        })
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self, InvalidArgument> {
        Sampler::new(config.sample_rate, config.bits_per_sample, config.channels)
    }

    /// Render one note and append it to the buffer.
    ///
    /// Appends `floor(sample_rate × duration_secs)` samples. `volume` must be
    /// in `0.0..=1.0`, or exactly [`LOUDEST`]. `duration_secs` must be finite,
    /// non-negative, and keep the buffer within one WAV data chunk. On error
    /// nothing is appended.
    ///
    /// Quantization truncates toward zero and then keeps the low 8 bits, so
    /// a shaped value of exactly +1.0 (256) wraps to 0 and overshoot from the
    /// additive generators wraps around rather than clipping.
    pub fn sample(
        &mut self,
        waveform: &Waveform,
        frequency_hz: u32,
        duration_secs: f64,
        envelope: &Envelope,
        volume: f64,
    ) -> Result<(), InvalidArgument> {
        let volume = validate_volume(volume)?;
        if frequency_hz == 0 {
            return Err(InvalidArgument::Frequency(frequency_hz));
        }

        let sample_count = self.checked_sample_count(duration_secs)?;
        let sample_rate = self.sample_rate as f64;
        let value_range = self.value_range();

        tracing::debug!(
            ?waveform,
            frequency_hz,
            duration_secs,
            volume,
            sample_count,
            "sampling note"
        );

        self.data.reserve(sample_count);
        for i in 0..sample_count {
            let time_index = i as f64 / sample_rate;
            let raw = waveform.generate(frequency_hz, time_index, duration_secs);
            let shaped = raw * envelope.amplitude(time_index) * volume;
            self.data.push(quantize(shaped, value_range));
        }

        Ok(())
    }

    /// Number of samples a note of `duration_secs` contributes.
    pub fn sample_count(&self, duration_secs: f64) -> usize {
        let n = (self.sample_rate as f64 * duration_secs).floor();
        if n > 0.0 { n as usize } else { 0 }
    }

    fn checked_sample_count(&self, duration_secs: f64) -> Result<usize, InvalidArgument> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(InvalidArgument::Duration(duration_secs));
        }
        let room = (MAX_DATA_BYTES - self.data.len()) as f64;
        if (self.sample_rate as f64 * duration_secs).floor() > room {
            return Err(InvalidArgument::Duration(duration_secs));
        }
        Ok(self.sample_count(duration_secs))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Quantized samples in the order they were rendered.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per sample frame (all channels).
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    fn value_range(&self) -> f64 {
        2.0_f64.powi(self.bits_per_sample as i32)
    }
}

fn validate_volume(volume: f64) -> Result<f64, InvalidArgument> {
    if volume == LOUDEST {
        Ok(1.0)
    } else if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(InvalidArgument::Volume(volume))
    }
}

/// Map [-1, 1] onto `0..value_range`, truncating like a narrowing cast.
fn quantize(shaped: f64, value_range: f64) -> u8 {
    let scaled = (shaped + 1.0) / 2.0 * value_range;
    // `as i64` truncates toward zero; `as u8` keeps the low byte.
    scaled as i64 as u8
}
