//! Song descriptions — ordered note events rendered into one sampler.
//!
//! A song is a flat list of notes played back to back, each with its own
//! waveform, envelope and volume. Songs can be built in code or loaded from
//! JSON:
//!
//! ```json
//! {
//!   "config": { "sample_rate": 22050 },
//!   "notes": [
//!     { "note": "E4", "duration": 0.25, "volume": 0.75 },
//!     { "waveform": "timbral", "note": "D4", "duration": 0.5,
//!       "envelope": "adsr", "volume": 11 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dsp::envelope::EnvelopeShape;
use crate::dsp::oscillator::Waveform;
use crate::dsp::sampler::{RenderConfig, Sampler};
use crate::error::ToneGenError;
use crate::notes::note_frequency;

/// Length of every note in the built-in melody, in seconds.
const MARY_NOTE_SECS: f64 = 0.25;

/// "Mary Had a Little Lamb" (http://www.choose-piano-lessons.com/piano-notes.html).
#[rustfmt::skip]
const MARY_HAD_A_LITTLE_LAMB: [&str; 26] = [
    // Ma-ry had a lit-tle lamb
    "E4", "D4", "C4", "D4", "E4", "E4", "E4",
    // lit-tle lamb, lit-tle lamb
    "D4", "D4", "D4", "E4", "E4", "E4",
    // Ma-ry had a lit-tle lamb
    "E4", "D4", "C4", "D4", "E4", "E4", "E4",
    // Its fleece was white as snow.
    "E4", "D4", "D4", "E4", "D4", "C4",
];

/// One note of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    #[serde(default)]
    pub waveform: Waveform,
    /// Note name, e.g. `"C#4"`.
    pub note: String,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub envelope: EnvelopeShape,
    /// 0.0..=1.0, or 11 for loudest.
    pub volume: f64,
}

impl NoteEvent {
    pub fn new(
        waveform: Waveform,
        note: impl Into<String>,
        duration: f64,
        envelope: EnvelopeShape,
        volume: f64,
    ) -> Self {
        NoteEvent {
            waveform,
            note: note.into(),
            duration,
            envelope,
            volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub config: RenderConfig,
    pub notes: Vec<NoteEvent>,
}

impl Song {
    pub fn new(config: RenderConfig) -> Self {
        Song {
            config,
            notes: Vec::new(),
        }
    }

    /// Parse a JSON song description.
    pub fn from_json(source: &str) -> Result<Self, ToneGenError> {
        Ok(serde_json::from_str(source)?)
    }

    /// The built-in demo melody: pure tones, flat envelope, 0.25 s per note.
    pub fn mary_had_a_little_lamb(volume: f64) -> Self {
        let notes = MARY_HAD_A_LITTLE_LAMB
            .iter()
            .map(|&name| {
                NoteEvent::new(
                    Waveform::PureTone,
                    name,
                    MARY_NOTE_SECS,
                    EnvelopeShape::Flat,
                    volume,
                )
            })
            .collect();
        Song {
            config: RenderConfig::default(),
            notes,
        }
    }

    pub fn push(&mut self, note: NoteEvent) {
        self.notes.push(note);
    }

    /// Total nominal length in seconds.
    pub fn duration(&self) -> f64 {
        self.notes.iter().map(|n| n.duration).sum()
    }

    /// Sample every note, in order, into a fresh sampler.
    ///
    /// Stops at the first note that fails; nothing is returned for a
    /// partially rendered song.
    pub fn render(&self) -> Result<Sampler, ToneGenError> {
        let mut sampler = Sampler::from_config(&self.config)?;
        for event in &self.notes {
            let frequency = note_frequency(&event.note)
                .ok_or_else(|| ToneGenError::UnknownNote(event.note.clone()))?;
            let envelope = event.envelope.build(event.duration)?;
            sampler.sample(&event.waveform, frequency, event.duration, &envelope, event.volume)?;
        }
        tracing::debug!(
            notes = self.notes.len(),
            samples = sampler.len(),
            "rendered song"
        );
        Ok(sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::Envelope;
    use crate::error::InvalidArgument;

    #[test]
    fn mary_renders_expected_length() {
        let song = Song::mary_had_a_little_lamb(0.75);
        assert_eq!(song.notes.len(), 26);
        assert!((song.duration() - 6.5).abs() < 1e-12);

        let sampler = song.render().unwrap();
        assert_eq!(sampler.len(), 26 * 5512);
        assert_eq!(sampler.sample_rate(), 22050);
    }

    #[test]
    fn render_matches_direct_sampling() {
        let mut song = Song::new(RenderConfig::default());
        song.push(NoteEvent::new(Waveform::Chirp, "A4", 0.3, EnvelopeShape::Adsr, 0.5));
        song.push(NoteEvent::new(Waveform::Square, "C4", 0.2, EnvelopeShape::Flat, 11.0));

        let mut direct = Sampler::new(22050, 8, 1).unwrap();
        direct
            .sample(&Waveform::Chirp, 440, 0.3, &Envelope::adsr(0.3).unwrap(), 0.5)
            .unwrap();
        direct
            .sample(&Waveform::Square, 262, 0.2, &Envelope::Flat, 1.0)
            .unwrap();

        assert_eq!(song.render().unwrap().data(), direct.data());
    }

    #[test]
    fn unknown_note_fails() {
        let mut song = Song::new(RenderConfig::default());
        song.push(NoteEvent::new(Waveform::PureTone, "H2", 0.1, EnvelopeShape::Flat, 0.5));
        let err = song.render().unwrap_err();
        assert!(matches!(err, ToneGenError::UnknownNote(ref n) if n == "H2"), "got {err:?}");
    }

    #[test]
    fn invalid_volume_aborts_render() {
        let mut song = Song::mary_had_a_little_lamb(0.75);
        song.notes[3].volume = 1.5;
        let err = song.render().unwrap_err();
        assert!(matches!(
            err,
            ToneGenError::InvalidArgument(InvalidArgument::Volume(v)) if v == 1.5
        ));
    }

    #[test]
    fn adsr_note_with_zero_duration_fails() {
        let mut song = Song::new(RenderConfig::default());
        song.push(NoteEvent::new(Waveform::PureTone, "C4", 0.0, EnvelopeShape::Adsr, 0.5));
        assert!(matches!(
            song.render().unwrap_err(),
            ToneGenError::InvalidArgument(InvalidArgument::EnvelopeDuration(_))
        ));
    }

    #[test]
    fn huge_duration_from_json_is_an_error() {
        let song =
            Song::from_json(r#"{"notes":[{"note":"E4","duration":1e300,"volume":0.5}]}"#).unwrap();
        assert!(matches!(
            song.render().unwrap_err(),
            ToneGenError::InvalidArgument(InvalidArgument::Duration(d)) if d == 1e300
        ));
    }

    #[test]
    fn negative_duration_fails_for_flat_envelope() {
        let mut song = Song::new(RenderConfig::default());
        song.push(NoteEvent::new(Waveform::PureTone, "C4", -1.0, EnvelopeShape::Flat, 0.5));
        assert!(matches!(
            song.render().unwrap_err(),
            ToneGenError::InvalidArgument(InvalidArgument::Duration(_))
        ));
    }

    #[test]
    fn unsupported_config_fails() {
        let song = Song::new(RenderConfig {
            channels: 2,
            ..RenderConfig::default()
        });
        assert!(matches!(
            song.render().unwrap_err(),
            ToneGenError::InvalidArgument(InvalidArgument::Channels(2))
        ));
    }

    #[test]
    fn parses_json_with_defaults() {
        let source = r#"{
            "config": { "sample_rate": 8000 },
            "notes": [
                { "note": "E4", "duration": 0.25, "volume": 0.75 },
                { "waveform": "timbral", "note": "D4", "duration": 0.5,
                  "envelope": "adsr", "volume": 11 }
            ]
        }"#;
        let song = Song::from_json(source).unwrap();
        assert_eq!(song.config.sample_rate, 8000);
        assert_eq!(song.config.bits_per_sample, 8);
        assert_eq!(
            song.notes[0],
            NoteEvent::new(Waveform::PureTone, "E4", 0.25, EnvelopeShape::Flat, 0.75)
        );
        assert_eq!(song.notes[1].waveform, Waveform::Timbral);
        assert_eq!(song.notes[1].envelope, EnvelopeShape::Adsr);
        assert_eq!(song.notes[1].volume, 11.0);

        let sampler = song.render().unwrap();
        assert_eq!(sampler.len(), 2000 + 4000);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Song::from_json(r#"{ "notes": [ { "note": "E4" } ] }"#).unwrap_err();
        assert!(matches!(err, ToneGenError::Song(_)), "got {err:?}");
    }
}
