//! Parsed track events

use serde::Serialize;

/// One event of a track chunk, as read back from a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    PolyPressure { channel: u8, key: u8, pressure: u8 },
    Controller { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: u16 },
    TimeSignature {
        numerator: u8,
        denominator: u16,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    },
    Tempo { microseconds_per_quarter: u32 },
    KeySignature { accidentals: i8, minor: bool },
    TrackName { text: String },
    Text { text: String },
    EndOfTrack,
    Meta { kind: u8, data: Vec<u8> },
    SysEx { data: Vec<u8> },
}

impl MidiEvent {
    /// True for a note-on with non-zero velocity
    pub fn is_sounding_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// True for a note-off, including note-on with zero velocity
    pub fn is_note_release(&self) -> bool {
        matches!(
            self,
            MidiEvent::NoteOff { .. } | MidiEvent::NoteOn { velocity: 0, .. }
        )
    }

    /// Key number of a note event
    pub fn key(&self) -> Option<u8> {
        match self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Event with its delta-time in ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackEvent {
    pub delta: u32,
    #[serde(flatten)]
    pub event: MidiEvent,
}
