//! JSON serialization types for MIDI data

use super::events::TrackEvent;
use super::reader::{MidiHeader, MidiTrack};
use serde::Serialize;

/// Top-level JSON structure for a MIDI file
#[derive(Debug, Clone, Serialize)]
pub struct MidiJson {
    pub header: MidiHeaderJson,
    pub tracks: Vec<MidiTrackJson>,
}

/// JSON representation of the header chunk
#[derive(Debug, Clone, Serialize)]
pub struct MidiHeaderJson {
    pub format: u16,
    pub tracks: u16,
    /// Ticks per quarter note
    pub division: u16,
}

/// JSON representation of a track chunk
#[derive(Debug, Clone, Serialize)]
pub struct MidiTrackJson {
    pub length: u32,
    /// Tick of the last event
    pub duration: u64,
    /// Number of sounding note-on events
    pub notes: usize,
    pub events: Vec<TrackEvent>,
}

impl MidiJson {
    pub fn new(header: &MidiHeader, tracks: Vec<MidiTrack>) -> Self {
        Self {
            header: MidiHeaderJson {
                format: header.format,
                tracks: header.tracks,
                division: header.division,
            },
            tracks: tracks.into_iter().map(MidiTrackJson::from).collect(),
        }
    }
}

impl From<MidiTrack> for MidiTrackJson {
    fn from(track: MidiTrack) -> Self {
        let duration = track.events.iter().map(|e| e.delta as u64).sum();
        let notes = track
            .events
            .iter()
            .filter(|e| e.event.is_sounding_note_on())
            .count();
        Self {
            length: track.declared_length,
            duration,
            notes,
            events: track.events,
        }
    }
}
