//! Note names to integer frequencies.
//!
//! Scientific pitch notation (https://pages.mtu.edu/~suits/notefreqs.html),
//! C0 through B8, rounded to whole Hz.

/// Lowest octave in the table.
const FIRST_OCTAVE: i32 = 0;
/// Highest octave in the table.
const LAST_OCTAVE: i32 = 8;

/// Frequencies in Hz, one row per octave, C through B.
#[rustfmt::skip]
const FREQUENCIES: [[u32; 12]; 9] = [
    [16, 17, 18, 19, 21, 22, 23, 25, 26, 28, 29, 31],
    [33, 35, 37, 39, 41, 44, 46, 49, 52, 55, 58, 62],
    [65, 69, 73, 78, 82, 87, 93, 98, 104, 110, 117, 123],
    [131, 139, 147, 156, 165, 175, 185, 196, 208, 220, 233, 247],
    [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494],
    [523, 554, 587, 622, 659, 698, 740, 784, 831, 880, 932, 988],
    [1047, 1109, 1175, 1245, 1319, 1397, 1480, 1568, 1661, 1760, 1865, 1976],
    [2093, 2217, 2349, 2489, 2637, 2794, 2960, 3136, 3322, 3520, 3729, 3951],
    [4186, 4435, 4699, 4978, 5274, 5588, 5920, 6272, 6645, 7040, 7459, 7902],
];

/// Resolve a note name such as `"E4"`, `"F#3"` or `"Bb5"` to Hz.
///
/// Returns `None` for malformed names or pitches outside C0..=B8.
pub fn note_frequency(name: &str) -> Option<u32> {
    let semitones = semitones_above_c0(name)?;
    let octave = semitones.div_euclid(12);
    if !(FIRST_OCTAVE..=LAST_OCTAVE).contains(&octave) {
        return None;
    }
    let pitch_class = semitones.rem_euclid(12);
    Some(FREQUENCIES[octave as usize][pitch_class as usize])
}

/// Semitone offset from C0, e.g. `"C4"` → 48.
fn semitones_above_c0(name: &str) -> Option<i32> {
    let mut chars = name.chars();
    let mut semitone = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let octave_str = if let Some(r) = rest.strip_prefix('#') {
        semitone += 1;
        r
    } else if let Some(r) = rest.strip_prefix('b') {
        semitone -= 1;
        r
    } else {
        rest
    };

    if octave_str.is_empty() || !octave_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let octave: i32 = octave_str.parse().ok()?;
    octave.checked_mul(12)?.checked_add(semitone)
}
