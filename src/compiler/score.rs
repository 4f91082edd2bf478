//! Markup score reader
//!
//! A score is one `<directive>` per line:
//!
//! ```text
//! <begin My Song>
//! <prefix>
//! <time-sig=3/4>
//! <tempo=90>
//! <key-sig=Gmaj>
//! </prefix>
//! <custom_file="chords.txt">
//! <commands>
//! <"I", "vi", "IV-q", "V7-a">
//! </commands>
//! <end>
//! ```
//!
//! Blank lines and lines starting with `;` are ignored.

use super::config::TrackConfig;
use crate::error::{Error, Result};
use crate::midi::TimeSignature;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

/// A parsed score: settings plus the chord tokens in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    pub config: TrackConfig,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Body,
    Prefix,
    Commands,
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

impl Score {
    pub fn parse<R: Read>(input: R) -> Result<Self> {
        let reader = BufReader::new(input);
        let mut score = Score::default();
        let mut section = Section::Start;
        let mut last_line = 0;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            last_line = line_no;
            let line = line?;
            let line = line.trim_start_matches('\u{FEFF}').trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let directive = line
                .strip_prefix('<')
                .and_then(|l| l.strip_suffix('>'))
                .map(str::trim)
                .ok_or_else(|| parse_error(line_no, format!("Expected <directive>, got '{}'", line)))?;

            match section {
                Section::Start => {
                    let title = directive
                        .strip_prefix("begin")
                        .ok_or_else(|| parse_error(line_no, "Score does not start with <begin>"))?;
                    let title = title.trim();
                    if !title.is_empty() {
                        score.config.title = title.to_string();
                    }
                    section = Section::Body;
                }
                Section::Body => match directive {
                    "prefix" => section = Section::Prefix,
                    "commands" => section = Section::Commands,
                    "end" => return Ok(score),
                    _ if directive.starts_with("custom_file") => {
                        let (_, value) = directive
                            .split_once('=')
                            .ok_or_else(|| parse_error(line_no, "custom_file without '='"))?;
                        let path = value.trim().trim_matches('"');
                        if path.is_empty() {
                            return Err(parse_error(line_no, "Empty custom_file path"));
                        }
                        score.config.custom_file = Some(PathBuf::from(path));
                    }
                    _ => {
                        return Err(parse_error(
                            line_no,
                            format!("Directive <{}> outside of its section", directive),
                        ))
                    }
                },
                Section::Prefix => {
                    if directive == "/prefix" {
                        section = Section::Body;
                    } else {
                        set_variable(&mut score.config, directive)
                            .map_err(|message| parse_error(line_no, message))?;
                    }
                }
                Section::Commands => match directive {
                    "/commands" => section = Section::Body,
                    "end" => return Err(parse_error(line_no, "Commands not finished")),
                    _ => score.tokens.extend(
                        directive
                            .split(',')
                            .map(|t| t.replace(['"', ' ', '\t'], ""))
                            .filter(|t| !t.is_empty()),
                    ),
                },
            }
        }

        match section {
            Section::Start => Err(parse_error(last_line, "Empty score")),
            Section::Prefix => Err(parse_error(last_line, "Unterminated <prefix> section")),
            Section::Commands => Err(parse_error(last_line, "Unterminated <commands> section")),
            Section::Body => Ok(score),
        }
    }
}

/// Apply one `name=value` prefix variable
fn set_variable(config: &mut TrackConfig, directive: &str) -> std::result::Result<(), String> {
    let (name, value) = directive
        .split_once('=')
        .ok_or_else(|| format!("Malformed variable <{}>", directive))?;
    let (name, value) = (name.trim(), value.trim().trim_matches('"'));
    let bad = |what: &str| format!("Invalid {} '{}'", what, value);

    match name {
        "time-sig" => {
            config.time_signature = TimeSignature::parse(value).map_err(|e| e.to_string())?;
        }
        "tempo" => config.tempo = value.parse().map_err(|_| bad("tempo"))?,
        "key-sig" => config.key = value.to_string(),
        "mode" => config.mode = value.parse().map_err(|_| bad("mode"))?,
        "octave" => config.octave_shift = value.parse().map_err(|_| bad("octave"))?,
        "ppq" => config.ppq = value.parse().map_err(|_| bad("ppq"))?,
        "program" => {
            config.program = value
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= 0x7F)
                .ok_or_else(|| bad("program"))?;
        }
        "arpeggiate" => {
            config.arpeggiate_all = match value {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => return Err(bad("arpeggiate flag")),
            }
        }
        _ => return Err(format!("Unknown variable '{}'", name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::resolver::ResolveMode;

    #[test]
    fn test_full_score() {
        let text = r#"
<begin My Song>
<prefix>
<time-sig=3/4>
<tempo=90>
<key-sig=Gmaj>
<mode=roman>
<octave=-1>
<ppq=480>
<program=0>
<arpeggiate=true>
</prefix>
<custom_file="chords.txt">
; comment
<commands>
<"I", "vi", "IV-q", "V7-a">
<"x32010;[0-12]">
</commands>
<end>
"#;
        let score = Score::parse(text.as_bytes()).unwrap();
        let c = &score.config;
        assert_eq!(c.title, "My Song");
        assert_eq!(c.time_signature.to_string(), "3/4");
        assert_eq!(c.tempo, 90);
        assert_eq!(c.key, "Gmaj");
        assert_eq!(c.mode, ResolveMode::Roman);
        assert_eq!(c.octave_shift, -1);
        assert_eq!(c.ppq, 480);
        assert_eq!(c.program, 0);
        assert!(c.arpeggiate_all);
        assert_eq!(c.custom_file, Some(PathBuf::from("chords.txt")));
        assert_eq!(score.tokens, vec!["I", "vi", "IV-q", "V7-a", "x32010;[0-12]"]);
    }

    #[test]
    fn test_defaults() {
        let score = Score::parse("<begin>\n<commands>\n<\"C\">\n</commands>\n<end>\n".as_bytes()).unwrap();
        assert_eq!(score.config, TrackConfig::default());
        assert_eq!(score.tokens, vec!["C"]);
    }

    #[test]
    fn test_missing_begin() {
        match Score::parse("<prefix>\n".as_bytes()) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_variable_outside_prefix() {
        let err = Score::parse("<begin T>\n<tempo=100>\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_bad_variables() {
        for var in ["<time-sig=3/5>", "<tempo=fast>", "<mode=jazz>", "<program=200>", "<volume=3>"] {
            let text = format!("<begin T>\n<prefix>\n{}\n</prefix>\n<end>\n", var);
            assert!(
                matches!(Score::parse(text.as_bytes()), Err(Error::Parse { line: 3, .. })),
                "{}",
                var
            );
        }
    }

    #[test]
    fn test_unterminated_commands() {
        let text = "<begin T>\n<commands>\n<\"C\">\n<end>\n";
        assert!(matches!(
            Score::parse(text.as_bytes()),
            Err(Error::Parse { line: 4, .. })
        ));

        let text = "<begin T>\n<commands>\n<\"C\">\n";
        assert!(Score::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn test_not_a_directive() {
        let text = "<begin T>\nC, G, Am\n";
        assert!(matches!(
            Score::parse(text.as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
    }
}
