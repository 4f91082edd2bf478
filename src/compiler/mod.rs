//! Score compiler - resolves chord tokens and generates the MIDI track
//!
//! Every token is resolved and sequenced before the output file is created,
//! so a bad token never leaves a partial file behind.

pub mod config;
pub mod event;
pub mod library;
pub mod resolver;
pub mod roman;
pub mod score;
pub mod sequencer;
pub mod tab;
pub mod token;

pub use config::TrackConfig;
pub use library::{ChordFile, ChordLibrary, CustomChord, NoLibrary};
pub use resolver::{ResolveMode, ResolvedChord, TokenResolver};
pub use score::Score;

use crate::error::{Error, Result};
use crate::midi::{TrackEncoder, TrackMeta};
use crate::tone::{KeySignature, Transposition};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Accepted output file extensions
pub const OUTPUT_EXTENSIONS: [&str; 2] = ["mid", "midi"];

/// Main compiler state
#[derive(Debug, Default)]
pub struct Compiler {
    /// Replaces the score's octave shift
    pub octave_shift: Option<i8>,
    /// Replaces the score's chord file
    pub custom_file: Option<PathBuf>,
    /// Base path for resolving the score's custom_file
    base_path: Option<PathBuf>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a score to a MIDI file
    pub fn compile<R: Read>(&mut self, input: R, output: &Path) -> Result<()> {
        check_output_path(output)?;
        let score = Score::parse(input)?;
        self.compile_score(score, output)
    }

    /// Compile a score file to a MIDI file
    ///
    /// This method sets the base path for resolving the chord file.
    pub fn compile_file(&mut self, input: &Path, output: &Path) -> Result<()> {
        check_output_path(output)?;
        self.base_path = input.parent().map(|p| p.to_path_buf());

        let file = File::open(input).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", input.display(), e),
            ))
        })?;
        let score = Score::parse(file)?;
        self.compile_score(score, output)
    }

    /// Compile an already parsed score
    pub fn compile_score(&self, mut score: Score, output: &Path) -> Result<()> {
        check_output_path(output)?;

        if let Some(shift) = self.octave_shift {
            score.config.octave_shift = shift;
        }
        let library = self.load_library(&score.config);
        let data = encode(&score.config, &score.tokens, &*library)?;

        let file = File::create(output).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create '{}': {}", output.display(), e),
            ))
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&data)?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} ({} chords, {} bytes)",
            output.display(),
            score.tokens.len(),
            data.len()
        );
        Ok(())
    }

    fn load_library(&self, config: &TrackConfig) -> Box<dyn ChordLibrary> {
        if let Some(path) = &self.custom_file {
            return Box::new(ChordFile::open(path));
        }
        match &config.custom_file {
            Some(path) => {
                let path = match &self.base_path {
                    Some(base) => base.join(path),
                    None => path.clone(),
                };
                Box::new(ChordFile::open(&path))
            }
            None => Box::new(NoLibrary),
        }
    }
}

/// Reject output paths without a MIDI extension
pub fn check_output_path(output: &Path) -> Result<()> {
    let ok = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| OUTPUT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
    if ok {
        Ok(())
    } else {
        Err(Error::OutputExtension(output.to_path_buf()))
    }
}

/// Resolve and sequence `tokens`, returning the complete file bytes
pub fn encode(config: &TrackConfig, tokens: &[String], library: &dyn ChordLibrary) -> Result<Vec<u8>> {
    let key = KeySignature::parse(&config.key)?;
    let mut encoder = TrackEncoder::new(config.ppq)?;
    encoder.begin_track(&TrackMeta {
        title: &config.title,
        time_signature: config.time_signature,
        tempo_bpm: config.tempo,
        key: &key,
        program: config.program,
    })?;

    let resolver = TokenResolver::new(&key, config.mode, library);
    let transposition = Transposition::octaves(config.octave_shift);
    let mut flip = false;

    for token in tokens {
        let mut chord = resolver.resolve(token, transposition)?;
        if config.arpeggiate_all {
            chord.arpeggiate = true;
            chord.reverse ^= flip;
            flip = !flip;
        }

        let events = sequencer::sequence(&chord, config.ppq);
        encoder.push_segment(event::encode_events(&events)?)?;
        tracing::debug!("Writing \"{}\": {:?}", token, chord.pitches);
    }

    encoder.finish()?;
    encoder.to_bytes()
}
