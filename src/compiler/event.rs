//! Note durations and note events

use crate::error::Result;
use crate::midi::header::{status, NOTE_CHANNEL};
use crate::midi::vlq;

/// Note value selected by a token's duration flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteValue {
    Whole,
    DottedWhole,
    #[default]
    Half,
    DottedHalf,
    Quarter,
    DottedQuarter,
    Eighth,
    DottedEighth,
    Sixteenth,
    DottedSixteenth,
    ThirtySecond,
    /// Eighth-note triplet ("o" for overflow)
    Triplet,
}

impl NoteValue {
    pub const ALL: [NoteValue; 12] = [
        NoteValue::Whole,
        NoteValue::DottedWhole,
        NoteValue::Half,
        NoteValue::DottedHalf,
        NoteValue::Quarter,
        NoteValue::DottedQuarter,
        NoteValue::Eighth,
        NoteValue::DottedEighth,
        NoteValue::Sixteenth,
        NoteValue::DottedSixteenth,
        NoteValue::ThirtySecond,
        NoteValue::Triplet,
    ];

    /// Flag text without the leading '-'
    pub fn flag(self) -> &'static str {
        match self {
            NoteValue::Whole => "w",
            NoteValue::DottedWhole => ".w",
            NoteValue::Half => "h",
            NoteValue::DottedHalf => ".h",
            NoteValue::Quarter => "q",
            NoteValue::DottedQuarter => ".q",
            NoteValue::Eighth => "e",
            NoteValue::DottedEighth => ".e",
            NoteValue::Sixteenth => "s",
            NoteValue::DottedSixteenth => ".s",
            NoteValue::ThirtySecond => "t",
            NoteValue::Triplet => "o",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.flag() == flag)
    }

    /// Length as a fraction of a quarter note
    fn quarters(self) -> (u32, u32) {
        match self {
            NoteValue::Whole => (4, 1),
            NoteValue::DottedWhole => (6, 1),
            NoteValue::Half => (2, 1),
            NoteValue::DottedHalf => (3, 1),
            NoteValue::Quarter => (1, 1),
            NoteValue::DottedQuarter => (3, 2),
            NoteValue::Eighth => (1, 2),
            NoteValue::DottedEighth => (3, 4),
            NoteValue::Sixteenth => (1, 4),
            NoteValue::DottedSixteenth => (3, 8),
            NoteValue::ThirtySecond => (1, 8),
            NoteValue::Triplet => (1, 3),
        }
    }

    /// Length in ticks at `ppq` ticks per quarter note
    pub fn ticks(self, ppq: u16) -> u32 {
        let (num, den) = self.quarters();
        ppq as u32 * num / den
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    On,
    Off,
}

/// One note-on or note-off with its delta-time in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub delta: u32,
    pub action: NoteAction,
    pub pitch: u8,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn on(delta: u32, pitch: u8, velocity: u8) -> Self {
        Self {
            delta,
            action: NoteAction::On,
            pitch,
            velocity,
        }
    }

    /// Release, written as a note-on with zero velocity
    pub fn off(delta: u32, pitch: u8) -> Self {
        Self {
            delta,
            action: NoteAction::Off,
            pitch,
            velocity: 0,
        }
    }

    /// Append delta-time, status, pitch and velocity
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&vlq::encode(self.delta)?);
        let velocity = match self.action {
            NoteAction::On => self.velocity & 0x7F,
            NoteAction::Off => 0,
        };
        out.extend_from_slice(&[status::NOTE_ON | NOTE_CHANNEL, self.pitch & 0x7F, velocity]);
        Ok(())
    }
}

/// Encode a token's events in order
pub fn encode_events(events: &[NoteEvent]) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(events.len() * 4);
    for event in events {
        event.encode_into(&mut data)?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_round_trip() {
        for value in NoteValue::ALL {
            assert_eq!(NoteValue::from_flag(value.flag()), Some(value));
        }
        assert_eq!(NoteValue::from_flag("x"), None);
    }

    #[test]
    fn test_ticks_at_96_ppq() {
        assert_eq!(NoteValue::Whole.ticks(96), 384);
        assert_eq!(NoteValue::DottedWhole.ticks(96), 576);
        assert_eq!(NoteValue::Half.ticks(96), 192);
        assert_eq!(NoteValue::DottedHalf.ticks(96), 288);
        assert_eq!(NoteValue::Quarter.ticks(96), 96);
        assert_eq!(NoteValue::DottedQuarter.ticks(96), 144);
        assert_eq!(NoteValue::Eighth.ticks(96), 48);
        assert_eq!(NoteValue::DottedEighth.ticks(96), 72);
        assert_eq!(NoteValue::Sixteenth.ticks(96), 24);
        assert_eq!(NoteValue::DottedSixteenth.ticks(96), 36);
        assert_eq!(NoteValue::ThirtySecond.ticks(96), 12);
        assert_eq!(NoteValue::Triplet.ticks(96), 32);
    }

    #[test]
    fn test_default_is_half() {
        assert_eq!(NoteValue::default(), NoteValue::Half);
    }

    #[test]
    fn test_encode_events() {
        let events = [NoteEvent::on(0, 60, 64), NoteEvent::off(192, 60)];
        assert_eq!(
            encode_events(&events).unwrap(),
            vec![0x00, 0x90, 60, 64, 0x81, 0x40, 0x90, 60, 0x00]
        );
    }
}
