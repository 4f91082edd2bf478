pub mod events;
pub mod header;
pub mod json;
pub mod reader;
pub mod vlq;
pub mod writer;

pub use events::{MidiEvent, TrackEvent};
pub use json::MidiJson;
pub use reader::{MidiHeader, MidiReader, MidiTrack};
pub use writer::{TimeSignature, TrackEncoder, TrackMeta};
