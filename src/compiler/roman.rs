//! Roman-numeral chords relative to the active key
//!
//! `[accidental]<numeral>[quality][*...][/[accidental]<numeral>]`, where an
//! upper-case numeral is a major chord and a lower-case one minor. With a
//! slash, the part before it picks a key inside the active key and the part
//! after it is read in that key.

use crate::error::{Error, Result};
use crate::tone::{quality, scale_degree, KeySignature, Mode, NoteName, ROMAN_NUMERALS};

/// A scale degree with its inflection and case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Degree {
    index: usize,
    shift: i8,
    mode: Mode,
}

/// Read an accidental prefix and a numeral; returns the degree and bytes consumed
fn parse_degree(s: &str) -> Option<(Degree, usize)> {
    let (shift, acc_len) = ["bb", "##", "b", "#"]
        .iter()
        .find(|acc| s.starts_with(**acc))
        .map(|acc| {
            let n = acc.len() as i8;
            (if acc.starts_with('b') { -n } else { n }, acc.len())
        })
        .unwrap_or((0, 0));

    let rest = &s[acc_len..];
    for (numeral, index) in ROMAN_NUMERALS {
        let mode = if rest.starts_with(numeral) {
            Mode::Major
        } else if rest.starts_with(numeral.to_ascii_lowercase().as_str()) {
            Mode::Minor
        } else {
            continue;
        };
        return Some((Degree { index, shift, mode }, acc_len + numeral.len()));
    }
    None
}

fn spell(tonic: NoteName, mode: Mode, degree: Degree) -> NoteName {
    scale_degree(tonic, mode, degree.index).inflect(degree.shift)
}

/// Quality name for a numeral's case and explicit suffix
fn quality_for(mode: Mode, suffix: &str) -> String {
    match mode {
        Mode::Major if suffix.is_empty() => "maj".to_string(),
        Mode::Major => suffix.to_string(),
        Mode::Minor if suffix.is_empty() => "m".to_string(),
        Mode::Minor => {
            let minor = format!("m{}", suffix);
            if quality::intervals_of(&minor).is_ok() {
                minor
            } else {
                suffix.to_string()
            }
        }
    }
}

/// Rewrite a roman-numeral body into an absolute chord such as "G7**"
///
/// Returns `Ok(None)` when the body does not start with a numeral, so the
/// caller can treat it as a literal chord or tablature.
pub fn rewrite(body: &str, key: &KeySignature) -> Result<Option<String>> {
    let (primary, secondary) = match body.split_once('/') {
        Some((p, s)) => (p, Some(s)),
        None => (body, None),
    };

    let Some((degree, len)) = parse_degree(primary) else {
        return Ok(None);
    };

    let suffix = &primary[len..];
    let quality_text = suffix.trim_end_matches('*');
    let mut stars = suffix.len() - quality_text.len();

    let mut root = spell(key.tonic(), key.mode(), degree);

    if let Some(secondary) = secondary {
        let secondary_numeral = secondary.trim_end_matches('*');
        stars = stars.max(secondary.len() - secondary_numeral.len());

        let (second, _) = parse_degree(secondary_numeral)
            .filter(|(_, l)| *l == secondary_numeral.len())
            .ok_or_else(|| Error::UnknownDegree(secondary.to_string()))?;

        // the primary degree names the key the secondary is read in
        root = spell(root, degree.mode, second);
    }

    Ok(Some(format!(
        "{}{}{}",
        root,
        quality_for(degree.mode, quality_text),
        "*".repeat(stars)
    )))
}
