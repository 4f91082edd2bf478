//! User-defined chords and strum patterns
//!
//! A chord file holds one definition per line; `#` starts a comment.
//!
//! ```text
//! sus9%: 0, 7, 14, 17
//! open%2: x02220
//! pattern 3/4:1 = 0-12-12
//! ```

use super::tab;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Body of a custom chord definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomChord {
    /// Semitone offsets from the token's root
    Intervals(Vec<i8>),
    /// Six-position tablature code, independent of the root
    Tablature(String),
}

/// Source of custom chords and named patterns
pub trait ChordLibrary {
    /// Look up a chord by its `name%n` key
    fn chord(&self, name: &str) -> Option<CustomChord>;

    /// Look up a named strum pattern
    fn pattern(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Library with no definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLibrary;

impl ChordLibrary for NoLibrary {
    fn chord(&self, _name: &str) -> Option<CustomChord> {
        None
    }
}

/// Definitions loaded from a chord file
#[derive(Debug, Clone, Default)]
pub struct ChordFile {
    chords: HashMap<String, CustomChord>,
    patterns: HashMap<String, String>,
}

impl ChordFile {
    /// Load a chord file
    ///
    /// A file that cannot be read yields an empty library.
    pub fn open(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let library = Self::parse(&text);
                tracing::debug!(
                    "Loaded {} chords and {} patterns from {}",
                    library.chords.len(),
                    library.patterns.len(),
                    path.display()
                );
                library
            }
            Err(e) => {
                tracing::warn!("Failed to read chord file '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut library = Self::default();

        for (index, line) in text.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((content, _)) => content,
                None => line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            if let Err(message) = library.parse_line(line) {
                tracing::warn!("Chord file line {}: {}, skipped", index + 1, message);
            }
        }

        library
    }

    fn parse_line(&mut self, line: &str) -> std::result::Result<(), String> {
        if let Some(rest) = line.strip_prefix("pattern ") {
            let (name, groups) = rest
                .split_once('=')
                .ok_or_else(|| format!("pattern without '=': {}", line))?;
            let (name, groups) = (name.trim(), groups.trim());
            if name.is_empty() || !is_pattern(groups) {
                return Err(format!("malformed pattern: {}", line));
            }
            self.patterns.insert(name.to_string(), groups.to_string());
            return Ok(());
        }

        let (name, body) = line
            .split_once(':')
            .ok_or_else(|| format!("definition without ':': {}", line))?;
        let (name, body) = (name.trim(), body.trim());
        if !name.contains('%') {
            return Err(format!("chord name '{}' has no '%'", name));
        }

        // six positions such as "000000" are a shape, not a single interval
        let chord = if !body.contains(',') && tab::parse(body).is_some() {
            CustomChord::Tablature(body.to_string())
        } else if body.contains(',') || body.parse::<i8>().is_ok() {
            let intervals = body
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|n| n.trim().parse::<i8>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| format!("bad interval in '{}': {}", body, e))?;
            CustomChord::Intervals(intervals)
        } else if !body.is_empty() {
            CustomChord::Tablature(body.to_string())
        } else {
            return Err(format!("empty definition for '{}'", name));
        };

        self.chords.insert(name.to_string(), chord);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chords.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChordLibrary for ChordFile {
    fn chord(&self, name: &str) -> Option<CustomChord> {
        self.chords.get(name).cloned()
    }

    fn pattern(&self, name: &str) -> Option<String> {
        self.patterns.get(name).cloned()
    }
}

fn is_pattern(groups: &str) -> bool {
    !groups.is_empty() && groups.chars().all(|c| c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# custom voicings
sus9%: 0, 7, 14, 17
open%2: x02220
wide%: [0, 12, 24]
pattern 3/4:1 = 0-12-12

broken line
bad%: 0, seven
pattern nothing =
";

    #[test]
    fn test_parse_definitions() {
        let library = ChordFile::parse(SAMPLE);
        assert_eq!(
            library.chord("sus9%"),
            Some(CustomChord::Intervals(vec![0, 7, 14, 17]))
        );
        assert_eq!(
            library.chord("open%2"),
            Some(CustomChord::Tablature("x02220".into()))
        );
        assert_eq!(
            library.chord("wide%"),
            Some(CustomChord::Intervals(vec![0, 12, 24]))
        );
        assert_eq!(library.pattern("3/4:1").as_deref(), Some("0-12-12"));
    }

    #[test]
    fn test_digit_only_shapes_are_tablature() {
        let library = ChordFile::parse("open%: 000000\nlow%: 000120\nfifth%: 7\nshort%: 0,7,12\n");
        assert_eq!(
            library.chord("open%"),
            Some(CustomChord::Tablature("000000".into()))
        );
        assert_eq!(
            library.chord("low%"),
            Some(CustomChord::Tablature("000120".into()))
        );
        assert_eq!(library.chord("fifth%"), Some(CustomChord::Intervals(vec![7])));
        assert_eq!(
            library.chord("short%"),
            Some(CustomChord::Intervals(vec![0, 7, 12]))
        );
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let library = ChordFile::parse(SAMPLE);
        assert_eq!(library.chord("bad%"), None);
        assert_eq!(library.pattern("nothing"), None);
        assert_eq!(library.len(), 4);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let library = ChordFile::open(Path::new("/nonexistent/chords.txt"));
        assert!(library.is_empty());
    }

    #[test]
    fn test_no_library() {
        assert_eq!(NoLibrary.chord("sus9%"), None);
        assert_eq!(NoLibrary.pattern("3/4:1"), None);
    }
}
