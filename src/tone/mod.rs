//! Pitch, chord and key reference tables
//!
//! Everything here is immutable lookup data. Octave shifting is applied by
//! callers through [`Transposition`], never by mutating a table.

pub mod key;
pub mod quality;

pub use key::{KeySignature, Mode};
pub use quality::{intervals_of, octave_tier, ChordQuality, QUALITIES};

use crate::error::{Error, Result};
use std::fmt;

/// MIDI number of C in the base pitch table (C2)
pub const BASE_C: i32 = 36;

/// 12-tone chromatic cycle, enharmonic spellings grouped
pub const CHROMATIC: [&str; 12] = [
    "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B",
];

/// Note letters in scale order with their natural semitone offset from C
pub const LETTERS: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Semitone steps of the major scale
pub const MAJOR_STEPS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Semitone steps of the natural minor scale
pub const MINOR_STEPS: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Roman numerals, longest first so "VII" is never read as "V"
pub const ROMAN_NUMERALS: [(&str, usize); 7] = [
    ("VII", 6),
    ("III", 2),
    ("II", 1),
    ("IV", 3),
    ("VI", 5),
    ("V", 4),
    ("I", 0),
];

/// Built-in strum patterns: groups of chord-tone indices separated by '-'
pub const PATTERNS: [(&str, &str); 2] = [("4/4:1", "03-1-2-03-2-1"), ("4/4:2", "0-1-2-3-2-1")];

/// Look up a built-in strum pattern
pub fn pattern(name: &str) -> Option<&'static str> {
    PATTERNS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, groups)| *groups)
}

/// A spelled note name: letter plus signed accidental count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub letter: char,
    pub accidental: i8,
}

impl NoteName {
    pub fn new(letter: char, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    /// Parse a note name at the start of `s` (letter, then up to two `#` or `b`)
    ///
    /// Returns the note and the number of bytes consumed.
    pub fn parse_prefix(s: &str) -> Option<(Self, usize)> {
        let bytes = s.as_bytes();
        let letter = *bytes.first()? as char;
        letter_index(letter)?;

        let mut pos = 1;
        let mut accidental = 0i8;
        while pos < bytes.len() && pos <= 2 {
            match bytes[pos] {
                b'#' if accidental >= 0 => accidental += 1,
                b'b' if accidental <= 0 => accidental -= 1,
                _ => break,
            }
            pos += 1;
        }

        Some((Self { letter, accidental }, pos))
    }

    /// Parse a complete note name such as "C", "F#" or "Bb"
    pub fn parse(s: &str) -> Result<Self> {
        match Self::parse_prefix(s) {
            Some((note, len)) if len == s.len() => Ok(note),
            _ => Err(Error::UnknownNote(s.to_string())),
        }
    }

    /// Semitones above C, not wrapped (Cb is -1, B# is 12)
    pub fn semitone(&self) -> i32 {
        let natural = letter_index(self.letter).map(|i| LETTERS[i].1).unwrap_or(0);
        natural + self.accidental as i32
    }

    /// Pitch class in 0..12
    pub fn pitch_class(&self) -> usize {
        self.semitone().rem_euclid(12) as usize
    }

    /// MIDI number in the base pitch table
    pub fn base_pitch(&self) -> i32 {
        BASE_C + self.semitone()
    }

    /// Same letter, accidental moved by `semitones`
    pub fn inflect(&self, semitones: i8) -> Self {
        Self {
            letter: self.letter,
            accidental: self.accidental.saturating_add(semitones),
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        let symbol = if self.accidental > 0 { '#' } else { 'b' };
        for _ in 0..self.accidental.unsigned_abs() {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

fn letter_index(letter: char) -> Option<usize> {
    LETTERS.iter().position(|(l, _)| *l == letter)
}

/// Base MIDI number of a note name (before octave shift)
pub fn pitch_of(name: &str) -> Result<u8> {
    let note = NoteName::parse(name)?;
    Ok(note.base_pitch() as u8)
}

/// Spell degree `degree` (wrapping mod 7) of the diatonic scale on `tonic`
pub fn scale_degree(tonic: NoteName, mode: Mode, degree: usize) -> NoteName {
    let steps = match mode {
        Mode::Major => &MAJOR_STEPS,
        Mode::Minor => &MINOR_STEPS,
    };
    let degree = degree % 7;
    let tonic_idx = letter_index(tonic.letter).unwrap_or(0);
    let (letter, natural) = LETTERS[(tonic_idx + degree) % 7];

    let target = tonic.semitone() + steps[degree];
    let mut accidental = (target - natural).rem_euclid(12);
    if accidental > 6 {
        accidental -= 12;
    }

    NoteName::new(letter, accidental as i8)
}

/// Index of a pitch class in [`CHROMATIC`]
pub fn chromatic_index(name: &str) -> Option<usize> {
    CHROMATIC
        .iter()
        .position(|entry| *entry == name || entry.split('/').any(|n| n == name))
}

/// One guitar string: open pitch class index and octave relative to [`BASE_C`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuitarString {
    pub open: usize,
    pub octave: i32,
}

impl GuitarString {
    /// Chromatic names starting from the open string
    pub fn names(&self) -> [&'static str; 12] {
        std::array::from_fn(|i| CHROMATIC[(self.open + i) % 12])
    }

    /// MIDI number of the open string
    pub fn open_pitch(&self) -> i32 {
        BASE_C + self.open as i32 + 12 * self.octave
    }
}

/// Standard tuning, low E to high E
pub const STANDARD_TUNING: [GuitarString; 6] = [
    GuitarString { open: 4, octave: 0 },
    GuitarString { open: 9, octave: 0 },
    GuitarString { open: 2, octave: 1 },
    GuitarString { open: 7, octave: 1 },
    GuitarString { open: 11, octave: 1 },
    GuitarString { open: 4, octave: 2 },
];

/// Signed whole-octave shift applied to every resolved pitch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transposition {
    octaves: i8,
}

impl Transposition {
    pub fn octaves(octaves: i8) -> Self {
        Self { octaves }
    }

    pub fn semitones(&self) -> i32 {
        self.octaves as i32 * 12
    }

    /// Shift a pitch and clamp it to the MIDI range
    pub fn apply(&self, pitch: i32) -> u8 {
        pitch.saturating_add(self.semitones()).clamp(0, 127) as u8
    }
}
