//! Per-file track settings

use super::resolver::ResolveMode;
use crate::midi::TimeSignature;
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Main";
pub const DEFAULT_TEMPO: u32 = 120;
pub const DEFAULT_KEY: &str = "Cmaj";
pub const DEFAULT_PPQ: u16 = 96;
/// Acoustic guitar (nylon)
pub const DEFAULT_PROGRAM: u8 = 24;

/// Settings for one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackConfig {
    pub title: String,
    pub time_signature: TimeSignature,
    /// Beats per minute
    pub tempo: u32,
    pub key: String,
    /// Ticks per quarter note
    pub ppq: u16,
    /// Whole octaves added to every pitch
    pub octave_shift: i8,
    pub mode: ResolveMode,
    pub program: u8,
    /// Arpeggiate every chord, alternating direction
    pub arpeggiate_all: bool,
    pub custom_file: Option<PathBuf>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            time_signature: TimeSignature::default(),
            tempo: DEFAULT_TEMPO,
            key: DEFAULT_KEY.to_string(),
            ppq: DEFAULT_PPQ,
            octave_shift: 0,
            mode: ResolveMode::Plain,
            program: DEFAULT_PROGRAM,
            arpeggiate_all: false,
            custom_file: None,
        }
    }
}
