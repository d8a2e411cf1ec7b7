//! Amplitude envelopes.
//!
//! Unlike a gated synthesizer envelope, these are evaluated directly from
//! the time index, so they carry no per-sample state and can be queried in
//! any order.

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;

/// Fraction of the note spent ramping 0 → 1.
const ATTACK_FRACTION: f64 = 0.1;
/// Fraction of the note spent ramping 1 → sustain.
const DECAY_FRACTION: f64 = 0.1;
/// Fraction of the note held at the sustain level.
const SUSTAIN_FRACTION: f64 = 0.7;
/// Fraction of the note spent ramping sustain → 0.
const RELEASE_FRACTION: f64 = 0.1;

/// Level held during the sustain phase.
pub const SUSTAIN_LEVEL: f64 = 0.7;

/// Amplitude shaping applied on top of a waveform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Envelope {
    /// Constant full amplitude.
    #[default]
    Flat,
    /// Fixed-proportion attack/decay/sustain/release over one note.
    Adsr(Adsr),
}

impl Envelope {
    /// ADSR envelope spanning `note_duration` seconds.
    pub fn adsr(note_duration: f64) -> Result<Self, InvalidArgument> {
        Adsr::new(note_duration).map(Envelope::Adsr)
    }

    /// Amplitude multiplier at `time_index` seconds into the note.
    pub fn amplitude(&self, time_index: f64) -> f64 {
        match self {
            Envelope::Flat => 1.0,
            Envelope::Adsr(adsr) => adsr.amplitude(time_index),
        }
    }
}

/// Serializable envelope selector.
///
/// ADSR depends on the note length, so song descriptions name the shape and
/// the concrete [`Envelope`] is built per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    #[default]
    Flat,
    Adsr,
}

impl EnvelopeShape {
    pub fn build(self, note_duration: f64) -> Result<Envelope, InvalidArgument> {
        match self {
            EnvelopeShape::Flat => Ok(Envelope::Flat),
            EnvelopeShape::Adsr => Envelope::adsr(note_duration),
        }
    }
}

/// Linear ADSR envelope with phase lengths proportional to the note.
///
/// Each phase owns the half-open interval `[start, end)`; the next phase
/// begins exactly at the previous end. Queries past the note keep following
/// the release slope (and go negative) instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    attack_end: f64,
    decay_end: f64,
    sustain_end: f64,
    release_time: f64,
}

impl Adsr {
    pub fn new(note_duration: f64) -> Result<Self, InvalidArgument> {
        // Also rejects NaN.
        if !(note_duration > 0.0) {
            return Err(InvalidArgument::EnvelopeDuration(note_duration));
        }
        let attack_end = note_duration * ATTACK_FRACTION;
        let decay_end = attack_end + note_duration * DECAY_FRACTION;
        let sustain_end = decay_end + note_duration * SUSTAIN_FRACTION;
        tracing::trace!(note_duration, attack_end, decay_end, sustain_end, "built ADSR envelope");
        Ok(Adsr {
            attack_end,
            decay_end,
            sustain_end,
            release_time: note_duration * RELEASE_FRACTION,
        })
    }

    /// Time at which the attack peak hands over to decay.
    pub fn attack_end(&self) -> f64 {
        self.attack_end
    }

    /// Time at which decay reaches the sustain level.
    pub fn decay_end(&self) -> f64 {
        self.decay_end
    }

    /// Time at which release begins.
    pub fn sustain_end(&self) -> f64 {
        self.sustain_end
    }

    pub fn amplitude(&self, time_index: f64) -> f64 {
        if time_index < self.attack_end {
            time_index / self.attack_end
        } else if time_index < self.decay_end {
            let t = (time_index - self.attack_end) / (self.decay_end - self.attack_end);
            1.0 - (1.0 - SUSTAIN_LEVEL) * t
        } else if time_index < self.sustain_end {
            SUSTAIN_LEVEL
        } else {
            let t = (time_index - self.sustain_end) / self.release_time;
            SUSTAIN_LEVEL * (1.0 - t)
        }
    }
}
