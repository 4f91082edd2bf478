//! SMF chunk layout and status bytes

/// Header chunk tag
pub const MTHD: &[u8; 4] = b"MThd";

/// Track chunk tag
pub const MTRK: &[u8; 4] = b"MTrk";

/// Length of the header chunk body
pub const HEADER_LENGTH: u32 = 6;

/// Multi-track file format
pub const FORMAT_MULTI_TRACK: u16 = 1;

/// Largest metrical division (bit 15 selects SMPTE timing)
pub const MAX_DIVISION: u16 = 0x7FFF;

/// Channel message status bytes
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROLLER: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const SYSEX: u8 = 0xF0;
    pub const SYSEX_ESCAPE: u8 = 0xF7;
    pub const META: u8 = 0xFF;
}

/// Meta event types
pub mod meta {
    pub const TEXT: u8 = 0x01;
    pub const TRACK_NAME: u8 = 0x03;
    pub const END_OF_TRACK: u8 = 0x2F;
    pub const TEMPO: u8 = 0x51;
    pub const TIME_SIGNATURE: u8 = 0x58;
    pub const KEY_SIGNATURE: u8 = 0x59;
}

/// Channel carrying note events
pub const NOTE_CHANNEL: u8 = 0;

/// Channel carrying the instrument program change
pub const PROGRAM_CHANNEL: u8 = 1;

/// MIDI clocks per metronome click in the time signature event
pub const CLOCKS_PER_CLICK: u8 = 0x24;

/// Notated 32nd notes per quarter note in the time signature event
pub const THIRTY_SECONDS_PER_QUARTER: u8 = 0x08;

/// Header chunk fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChunk {
    pub format: u16,
    pub tracks: u16,
    pub division: u16,
}

impl HeaderChunk {
    pub fn new(tracks: u16, division: u16) -> Self {
        Self {
            format: FORMAT_MULTI_TRACK,
            tracks,
            division,
        }
    }

    /// Serialized chunk: tag, length, then big-endian fields
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(14);
        data.extend_from_slice(MTHD);
        data.extend_from_slice(&HEADER_LENGTH.to_be_bytes());
        data.extend_from_slice(&self.format.to_be_bytes());
        data.extend_from_slice(&self.tracks.to_be_bytes());
        data.extend_from_slice(&self.division.to_be_bytes());
        data
    }
}
