//! Token resolution
//!
//! Turns one chord token into absolute pitches and playback modifiers. The
//! order of attempts is fixed: pattern tag, flags, roman-numeral rewrite,
//! literal chord, custom chord, tablature, and finally a single fallback
//! note.

use super::event::NoteValue;
use super::library::{ChordLibrary, CustomChord};
use super::roman;
use super::tab;
use super::token::{split_token, Arpeggio};
use crate::error::{Error, Result};
use crate::tone::{self, octave_tier, quality, KeySignature, NoteName, Transposition};
use std::fmt;
use std::str::FromStr;

/// Pitch used when a token cannot be resolved (E5)
pub const FALLBACK_PITCH: u8 = 76;

/// How chord bodies are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Absolute chord names such as "G7"
    #[default]
    Plain,
    /// Roman numerals relative to the active key, absolute names still accepted
    Roman,
}

impl FromStr for ResolveMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "cn" => Ok(ResolveMode::Plain),
            "roman" | "rn" => Ok(ResolveMode::Roman),
            _ => Err(Error::Parse {
                line: 0,
                message: format!("Unknown mode '{}' (expected plain or roman)", s),
            }),
        }
    }
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveMode::Plain => write!(f, "plain"),
            ResolveMode::Roman => write!(f, "roman"),
        }
    }
}

/// A token's pitches and playback modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChord {
    pub pitches: Vec<u8>,
    pub arpeggiate: bool,
    pub reverse: bool,
    pub duration: NoteValue,
    /// Strum pattern groups, e.g. "03-1-2"
    pub pattern: Option<String>,
}

/// Resolves tokens against a key, a mode and a chord library
pub struct TokenResolver<'a> {
    key: &'a KeySignature,
    mode: ResolveMode,
    library: &'a dyn ChordLibrary,
}

impl<'a> TokenResolver<'a> {
    pub fn new(key: &'a KeySignature, mode: ResolveMode, library: &'a dyn ChordLibrary) -> Self {
        Self { key, mode, library }
    }

    /// Resolve one token
    ///
    /// Conflicting duration or arpeggio flags are errors. A body that
    /// matches nothing resolves to [`FALLBACK_PITCH`] with a warning.
    pub fn resolve(&self, token: &str, transposition: Transposition) -> Result<ResolvedChord> {
        let parts = split_token(token)?;

        let pattern = parts
            .pattern_tag
            .as_deref()
            .and_then(|tag| self.pattern(tag, token));

        let pitches = self.pitches(&parts.body, transposition).unwrap_or_else(|| {
            tracing::warn!(
                "Chord '{}' not found, playing fallback note {}",
                parts.body,
                FALLBACK_PITCH
            );
            vec![FALLBACK_PITCH]
        });

        Ok(ResolvedChord {
            pitches,
            arpeggiate: parts.arpeggio.is_some(),
            reverse: parts.arpeggio == Some(Arpeggio::Descending),
            duration: parts.duration.unwrap_or_default(),
            pattern,
        })
    }

    fn pattern(&self, tag: &str, token: &str) -> Option<String> {
        if let Some(inline) = tag.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return Some(inline.to_string());
        }
        let found = tone::pattern(tag)
            .map(str::to_string)
            .or_else(|| self.library.pattern(tag));
        if found.is_none() {
            tracing::warn!("Unknown pattern '{}' in token '{}', ignored", tag, token);
        }
        found
    }

    fn pitches(&self, body: &str, transposition: Transposition) -> Option<Vec<u8>> {
        let rewritten;
        let body = match self.mode {
            ResolveMode::Plain => body,
            ResolveMode::Roman => match roman::rewrite(body, self.key) {
                Ok(Some(chord)) => {
                    tracing::debug!("{} in {} is {}", body, self.key.name(), chord);
                    rewritten = chord;
                    rewritten.as_str()
                }
                Ok(None) => body,
                Err(e) => {
                    tracing::warn!("{}", e);
                    return None;
                }
            },
        };

        if body.contains('%') {
            if let Some(pitches) = self.custom(body, transposition) {
                return Some(pitches);
            }
        } else if let Some(pitches) = literal(body, transposition) {
            return Some(pitches);
        }

        tab::resolve(body, transposition)
    }

    /// `<root><name>%[n][*...]` looked up in the chord library
    fn custom(&self, body: &str, transposition: Transposition) -> Option<Vec<u8>> {
        let (root, len) = NoteName::parse_prefix(body)?;
        let rest = &body[len..];
        let name = rest.trim_end_matches('*');
        let tier = octave_tier(rest.len() - name.len())?;

        match self.library.chord(name)? {
            CustomChord::Intervals(intervals) => Some(
                intervals
                    .iter()
                    .map(|i| transposition.apply(root.base_pitch() + tier + *i as i32))
                    .collect(),
            ),
            CustomChord::Tablature(code) => tab::resolve(&code, transposition),
        }
    }
}

/// `<root>[quality][*...]` with the longest matching quality name
fn literal(body: &str, transposition: Transposition) -> Option<Vec<u8>> {
    let (root, len) = NoteName::parse_prefix(body)?;
    let rest = &body[len..];

    let (intervals, stars) = match quality::longest_prefix(rest) {
        Some(q) => (q.intervals, &rest[q.name.len()..]),
        None => (quality::intervals_of("maj").ok()?, rest),
    };
    if !stars.bytes().all(|b| b == b'*') {
        return None;
    }
    let tier = octave_tier(stars.len())?;

    let base = root.base_pitch() + tier;
    Some(
        intervals
            .iter()
            .map(|i| transposition.apply(base + *i as i32))
            .collect(),
    )
}
