//! Waveform generators.
//!
//! Each generator is a pure function of frequency and elapsed time (and,
//! for the chirp, the total note duration). They hold no state, so a single
//! value can be shared freely between samplers.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Number of odd harmonics summed by [`Waveform::Square`] (1st..9th).
const SQUARE_ODD_HARMONICS: u32 = 5;

/// Global scale applied to the timbral partial sum.
const TIMBRAL_SCALE: f64 = 0.49;

/// A single partial of the timbral voice.
struct Partial {
    harmonic: f64,
    amplitude: f64,
    /// Cosine partials are a quarter period ahead of sine partials.
    cosine: bool,
}

/// Empirical violin-like spectrum: strong low partials, 7th and 9th absent.
#[rustfmt::skip]
const TIMBRAL_PARTIALS: [Partial; 8] = [
    Partial { harmonic: 1.0, amplitude: 1.00, cosine: false },
    Partial { harmonic: 2.0, amplitude: 0.61, cosine: true },
    Partial { harmonic: 3.0, amplitude: 0.45, cosine: false },
    Partial { harmonic: 4.0, amplitude: 0.29, cosine: true },
    Partial { harmonic: 5.0, amplitude: 0.22, cosine: false },
    Partial { harmonic: 6.0, amplitude: 0.14, cosine: true },
    Partial { harmonic: 8.0, amplitude: 0.08, cosine: false },
    Partial { harmonic: 10.0, amplitude: 0.05, cosine: true },
];

/// Supported tone generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// A single sine at the fundamental.
    #[default]
    PureTone,
    /// First five odd harmonics of a square wave (band-limited, with ripple).
    Square,
    /// Weighted harmonic series approximating a bowed string.
    Timbral,
    /// Linear sweep from the fundamental up to ten times the fundamental.
    Chirp,
}

impl Waveform {
    /// Signal value for `frequency_hz` at `time_index` seconds into a note
    /// lasting `note_duration` seconds.
    ///
    /// Pure tone stays within [-1, 1]. The additive variants are not
    /// normalized and may overshoot slightly.
    pub fn generate(&self, frequency_hz: u32, time_index: f64, note_duration: f64) -> f64 {
        let frequency = frequency_hz as f64;
        match self {
            Waveform::PureTone => sine(frequency, time_index),
            Waveform::Square => square(frequency, time_index),
            Waveform::Timbral => timbral(frequency, time_index),
            Waveform::Chirp => chirp(frequency, time_index, note_duration),
        }
    }
}

fn sine(frequency: f64, time_index: f64) -> f64 {
    (2.0 * PI * frequency * time_index).sin()
}

fn square(frequency: f64, time_index: f64) -> f64 {
    (0..SQUARE_ODD_HARMONICS)
        .map(|k| {
            let n = (2 * k + 1) as f64;
            sine(frequency * n, time_index) / n
        })
        .sum()
}

fn timbral(frequency: f64, time_index: f64) -> f64 {
    let sum: f64 = TIMBRAL_PARTIALS
        .iter()
        .map(|p| {
            let radians = 2.0 * PI * frequency * p.harmonic * time_index;
            let value = if p.cosine { radians.cos() } else { radians.sin() };
            p.amplitude * value
        })
        .sum();
    sum * TIMBRAL_SCALE
}

/// Evaluates a sine at the momentary frequency; phase is not integrated.
fn chirp(frequency: f64, time_index: f64, note_duration: f64) -> f64 {
    let sweep_rate = 9.0 * frequency / note_duration;
    let momentary = frequency + sweep_rate * time_index;
    sine(momentary, time_index)
}
