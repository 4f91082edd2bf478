//! Six-string tablature codes
//!
//! One position per string from low E to high E: `x` mutes the string, a
//! digit is a fret, and `(nn)` is a fret of more than one digit. The fret
//! modulo 12 picks the pitch class from the string's tuning table and the
//! fret divided by 12 adds whole octaves.

use crate::tone::{chromatic_index, GuitarString, Transposition, BASE_C, STANDARD_TUNING};

/// One string of a tablature code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fret {
    Muted,
    Fretted(u32),
}

/// Split a code into exactly six positions
///
/// Returns `None` when the text is not shaped like tablature: wrong number
/// of positions, an unclosed parenthesis, an invalid first position, or no
/// `x` or digit at all.
pub fn parse(code: &str) -> Option<Vec<Fret>> {
    let mut frets = Vec::with_capacity(6);
    let mut chars = code.chars();
    let mut recognised = false;
    let mut invalid = Vec::new();

    while let Some(c) = chars.next() {
        let fret = match c {
            'x' | 'X' => {
                recognised = true;
                Fret::Muted
            }
            '0'..='9' => {
                recognised = true;
                Fret::Fretted(c as u32 - '0' as u32)
            }
            '(' => {
                let mut value = 0u32;
                let mut digits = 0;
                loop {
                    match chars.next()? {
                        ')' => break,
                        d @ '0'..='9' => {
                            value = value.saturating_mul(10).saturating_add(d as u32 - '0' as u32);
                            digits += 1;
                        }
                        _ => return None,
                    }
                }
                if digits == 0 {
                    return None;
                }
                recognised = true;
                Fret::Fretted(value)
            }
            // a code never starts with an invalid position
            _ if frets.is_empty() => return None,
            other => {
                invalid.push(other);
                Fret::Muted
            }
        };
        frets.push(fret);
    }

    if !recognised || frets.len() != STANDARD_TUNING.len() {
        return None;
    }
    for c in invalid {
        tracing::warn!("Invalid tablature character '{}' in '{}', string muted", c, code);
    }
    Some(frets)
}

/// MIDI pitch of `fret` on `string`, before transposition
pub fn fret_pitch(string: &GuitarString, fret: u32) -> i32 {
    let name = string.names()[(fret % 12) as usize];
    let pitch_class = chromatic_index(name).unwrap_or(string.open) as i32;

    // a pitch class below the open string's has wrapped past C
    let wrapped = (pitch_class < string.open as i32) as i32;
    let carry = (fret / 12).min(i32::MAX as u32 / 12) as i32;
    let octave = string.octave + wrapped + carry;

    BASE_C.saturating_add(pitch_class).saturating_add(octave.saturating_mul(12))
}

/// Resolve a code against standard tuning; muted strings are omitted
///
/// A code with every string muted sounds nothing and resolves to `None`.
pub fn resolve(code: &str, transposition: Transposition) -> Option<Vec<u8>> {
    let frets = parse(code)?;
    let pitches: Vec<u8> = frets
        .iter()
        .zip(STANDARD_TUNING.iter())
        .filter_map(|(fret, string)| match fret {
            Fret::Muted => None,
            Fret::Fretted(f) => Some(transposition.apply(fret_pitch(string, *f))),
        })
        .collect();
    (!pitches.is_empty()).then_some(pitches)
}
