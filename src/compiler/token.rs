//! Chord token grammar: body, flags and pattern tag
//!
//! ```text
//! token   := body ("-" flag)* (";" tag)?
//! flag    := "a" | "ar" | duration
//! tag     := pattern-name | "[" groups "]"
//! ```

use super::event::NoteValue;
use crate::error::{Error, Result};

/// Arpeggio direction requested by `-a` / `-ar`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arpeggio {
    Ascending,
    Descending,
}

/// A token split into its chord body and playback modifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenParts {
    pub body: String,
    pub pattern_tag: Option<String>,
    pub arpeggio: Option<Arpeggio>,
    pub duration: Option<NoteValue>,
}

/// Split a token into body, pattern tag, arpeggio flag and duration flag
///
/// A second arpeggio or duration flag on the same token is an error.
pub fn split_token(token: &str) -> Result<TokenParts> {
    let token = token.trim();
    let (rest, tag) = match token.split_once(';') {
        Some((rest, tag)) => (rest, Some(tag.trim().to_string())),
        None => (token, None),
    };

    let mut pieces = rest.split('-');
    let body = pieces.next().unwrap_or("").to_string();

    let mut parts = TokenParts {
        body,
        pattern_tag: tag.filter(|t| !t.is_empty()),
        ..Default::default()
    };

    for flag in pieces {
        match flag {
            "" => {}
            "a" | "ar" => {
                if parts.arpeggio.is_some() {
                    return Err(Error::DuplicateArpeggio {
                        token: token.to_string(),
                    });
                }
                parts.arpeggio = Some(if flag == "ar" {
                    Arpeggio::Descending
                } else {
                    Arpeggio::Ascending
                });
            }
            _ => match NoteValue::from_flag(flag) {
                Some(value) => {
                    if let Some(bound) = parts.duration {
                        return Err(Error::DuplicateDuration {
                            token: token.to_string(),
                            bound: bound.flag().to_string(),
                            flag: flag.to_string(),
                        });
                    }
                    parts.duration = Some(value);
                }
                None => {
                    tracing::warn!("Ignoring unknown flag -{} in token '{}'", flag, token);
                }
            },
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_body() {
        let parts = split_token("Dbmaj7*").unwrap();
        assert_eq!(parts.body, "Dbmaj7*");
        assert_eq!(parts.arpeggio, None);
        assert_eq!(parts.duration, None);
        assert_eq!(parts.pattern_tag, None);
    }

    #[test]
    fn test_all_modifiers() {
        let parts = split_token("Am7**-ar-.e;4/4:1").unwrap();
        assert_eq!(parts.body, "Am7**");
        assert_eq!(parts.arpeggio, Some(Arpeggio::Descending));
        assert_eq!(parts.duration, Some(NoteValue::DottedEighth));
        assert_eq!(parts.pattern_tag.as_deref(), Some("4/4:1"));
    }

    #[test]
    fn test_flag_order_is_free() {
        let parts = split_token("x32010-q-a").unwrap();
        assert_eq!(parts.body, "x32010");
        assert_eq!(parts.arpeggio, Some(Arpeggio::Ascending));
        assert_eq!(parts.duration, Some(NoteValue::Quarter));
    }

    #[test]
    fn test_inline_pattern_keeps_dashes() {
        let parts = split_token("G-e;[0-12-3]").unwrap();
        assert_eq!(parts.body, "G");
        assert_eq!(parts.pattern_tag.as_deref(), Some("[0-12-3]"));
    }

    #[test]
    fn test_duplicate_duration_is_fatal() {
        match split_token("Cmaj-q-e") {
            Err(Error::DuplicateDuration { token, bound, flag }) => {
                assert_eq!(token, "Cmaj-q-e");
                assert_eq!(bound, "q");
                assert_eq!(flag, "e");
            }
            other => panic!("expected duplicate duration, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_arpeggio_is_fatal() {
        assert!(matches!(
            split_token("Cmaj-a-ar"),
            Err(Error::DuplicateArpeggio { .. })
        ));
    }

    #[test]
    fn test_unknown_flag_ignored() {
        let parts = split_token("Cmaj-zz-h").unwrap();
        assert_eq!(parts.duration, Some(NoteValue::Half));
    }
}
