//! Key signatures

use super::{scale_degree, NoteName};
use crate::error::{Error, Result};

/// Sharps (positive) or flats (negative) for each major key
const MAJOR_KEYS: [(&str, i8); 15] = [
    ("Cb", -7),
    ("Gb", -6),
    ("Db", -5),
    ("Ab", -4),
    ("Eb", -3),
    ("Bb", -2),
    ("F", -1),
    ("C", 0),
    ("G", 1),
    ("D", 2),
    ("A", 3),
    ("E", 4),
    ("B", 5),
    ("F#", 6),
    ("C#", 7),
];

/// Sharps (positive) or flats (negative) for each minor key
const MINOR_KEYS: [(&str, i8); 15] = [
    ("Ab", -7),
    ("Eb", -6),
    ("Bb", -5),
    ("F", -4),
    ("C", -3),
    ("G", -2),
    ("D", -1),
    ("A", 0),
    ("E", 1),
    ("B", 2),
    ("F#", 3),
    ("C#", 4),
    ("G#", 5),
    ("D#", 6),
    ("A#", 7),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Mode byte of the key signature meta event
    pub fn as_byte(self) -> u8 {
        match self {
            Mode::Major => 0,
            Mode::Minor => 1,
        }
    }
}

/// A parsed key signature such as "Cmaj" or "F#m"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySignature {
    name: String,
    tonic: NoteName,
    accidentals: i8,
    mode: Mode,
}

impl KeySignature {
    /// Parse `<tonic><maj|major|m|min|minor>`
    pub fn parse(key: &str) -> Result<Self> {
        let unknown = || Error::UnknownKey(key.to_string());
        let (tonic, len) = NoteName::parse_prefix(key).ok_or_else(unknown)?;

        let mode = match &key[len..] {
            "maj" | "major" => Mode::Major,
            "m" | "min" | "minor" => Mode::Minor,
            _ => return Err(unknown()),
        };

        let table: &[(&str, i8)] = match mode {
            Mode::Major => &MAJOR_KEYS,
            Mode::Minor => &MINOR_KEYS,
        };
        let spelled = tonic.to_string();
        let accidentals = table
            .iter()
            .find(|(name, _)| *name == spelled)
            .map(|(_, count)| *count)
            .ok_or_else(unknown)?;

        Ok(Self {
            name: key.to_string(),
            tonic,
            accidentals,
            mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tonic(&self) -> NoteName {
        self.tonic
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Signed sharp/flat count (-7..=7)
    pub fn accidentals(&self) -> i8 {
        self.accidentals
    }

    pub fn is_minor(&self) -> bool {
        self.mode == Mode::Minor
    }

    /// Spelled note of a zero-based scale degree
    pub fn degree(&self, degree: usize) -> NoteName {
        scale_degree(self.tonic, self.mode, degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_keys() {
        let key = KeySignature::parse("Cmaj").unwrap();
        assert_eq!(key.accidentals(), 0);
        assert!(!key.is_minor());

        let key = KeySignature::parse("Ebmaj").unwrap();
        assert_eq!(key.accidentals(), -3);

        let key = KeySignature::parse("F#major").unwrap();
        assert_eq!(key.accidentals(), 6);
    }

    #[test]
    fn test_minor_keys() {
        let key = KeySignature::parse("Am").unwrap();
        assert_eq!(key.accidentals(), 0);
        assert!(key.is_minor());

        let key = KeySignature::parse("Cmin").unwrap();
        assert_eq!(key.accidentals(), -3);
        assert_eq!(key.degree(2).to_string(), "Eb");
    }

    #[test]
    fn test_unknown_keys() {
        assert!(matches!(KeySignature::parse("C"), Err(Error::UnknownKey(_))));
        assert!(matches!(KeySignature::parse("D#maj"), Err(Error::UnknownKey(_))));
        assert!(matches!(KeySignature::parse("Hmaj"), Err(Error::UnknownKey(_))));
        assert!(matches!(KeySignature::parse(""), Err(Error::UnknownKey(_))));
    }
}
