use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("MIDI parse error: {0}")]
    MidiParse(String),

    #[error("Unknown key signature: {0}")]
    UnknownKey(String),

    #[error("Unknown chord quality: {0}")]
    UnknownQuality(String),

    #[error("Unknown scale degree: {0}")]
    UnknownDegree(String),

    #[error("Unknown note name: {0}")]
    UnknownNote(String),

    #[error("Invalid time signature '{0}' (expected N/D with D a power of two)")]
    TimeSignature(String),

    #[error("Tempo out of range: {0} bpm")]
    Tempo(u32),

    #[error("Invalid division: {0} ticks per quarter note")]
    Division(u16),

    #[error("Token '{token}': duration flag -{flag} conflicts with already bound -{bound}")]
    DuplicateDuration {
        token: String,
        bound: String,
        flag: String,
    },

    #[error("Token '{token}': more than one arpeggio flag")]
    DuplicateArpeggio { token: String },

    #[error("Output file '{}' must end in .mid or .midi", .0.display())]
    OutputExtension(PathBuf),

    #[error("Value {0} does not fit in a variable-length quantity")]
    VlqOverflow(u64),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
