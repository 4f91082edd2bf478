//! Chord qualities
//!
//! Interval lists are guitar voicings built on a root on the low strings,
//! ascending, root first.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordQuality {
    pub name: &'static str,
    pub intervals: &'static [i8],
}

const fn quality(name: &'static str, intervals: &'static [i8]) -> ChordQuality {
    ChordQuality { name, intervals }
}

pub const QUALITIES: &[ChordQuality] = &[
    quality("maj", &[0, 7, 12, 16, 19, 24]),
    quality("m", &[0, 7, 12, 15, 19, 24]),
    quality("7", &[0, 7, 10, 16, 19, 24]),
    quality("maj7", &[0, 7, 11, 16, 19]),
    quality("m7", &[0, 7, 10, 15, 19, 24]),
    quality("mM7", &[0, 7, 11, 15, 19]),
    quality("m7b5", &[0, 6, 10, 15]),
    quality("maj6", &[0, 7, 12, 16, 21]),
    quality("m6", &[0, 7, 12, 15, 21]),
    quality("dim", &[0, 6, 12, 15]),
    quality("dim7", &[0, 6, 9, 15]),
    quality("aug", &[0, 4, 8, 12]),
    quality("aug7", &[0, 8, 10, 16]),
    quality("sus2", &[0, 7, 12, 14, 19]),
    quality("sus4", &[0, 7, 12, 17, 19]),
    quality("9", &[0, 4, 10, 14, 19]),
    quality("add9", &[0, 4, 7, 14]),
    quality("13", &[0, 4, 10, 14, 21]),
    quality("5", &[0, 7, 12]),
];

/// Interval list of a named quality
pub fn intervals_of(name: &str) -> Result<&'static [i8]> {
    QUALITIES
        .iter()
        .find(|q| q.name == name)
        .map(|q| q.intervals)
        .ok_or_else(|| Error::UnknownQuality(name.to_string()))
}

/// Longest quality name that `s` starts with
pub fn longest_prefix(s: &str) -> Option<&'static ChordQuality> {
    QUALITIES
        .iter()
        .filter(|q| s.starts_with(q.name))
        .max_by_key(|q| q.name.len())
}

/// Octave correction for a run of `*` characters
pub fn octave_tier(stars: usize) -> Option<i32> {
    match stars {
        0 | 1 => Some(0),
        2 => Some(12),
        3 => Some(24),
        _ => None,
    }
}
