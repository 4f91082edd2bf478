//! SMF reader and parser

use super::events::{MidiEvent, TrackEvent};
use super::header::{meta, status, HEADER_LENGTH, MTHD, MTRK};
use super::vlq;
use crate::error::{Error, Result};

/// Parsed header chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiHeader {
    pub format: u16,
    pub tracks: u16,
    pub division: u16,
}

/// Parsed track chunk
#[derive(Debug, Clone, Default)]
pub struct MidiTrack {
    /// Length field as written in the file
    pub declared_length: u32,
    pub events: Vec<TrackEvent>,
}

/// SMF reader over an in-memory file
pub struct MidiReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MidiReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(Error::MidiParse("Unexpected end of data".into()));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let hi = self.read_u16_be()? as u32;
        let lo = self.read_u16_be()? as u32;
        Ok((hi << 16) | lo)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.pos + len > self.data.len() {
            return Err(Error::MidiParse("Unexpected end of data".into()));
        }
        let bytes = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    /// Read a variable-length quantity
    pub fn read_vlq(&mut self) -> Result<u32> {
        let (value, len) = vlq::decode(&self.data[self.pos.min(self.data.len())..])?;
        self.pos += len;
        Ok(value)
    }

    /// Validate the MThd chunk and read its fields
    pub fn parse_header(&mut self) -> Result<MidiHeader> {
        self.pos = 0;
        if self.read_bytes(4)? != MTHD {
            return Err(Error::MidiParse("Invalid MThd tag".into()));
        }
        let length = self.read_u32_be()?;
        if length < HEADER_LENGTH {
            return Err(Error::MidiParse(format!("Header length {} too short", length)));
        }
        let format = self.read_u16_be()?;
        let tracks = self.read_u16_be()?;
        let division = self.read_u16_be()?;

        // skip any extension of the header body
        self.read_bytes((length - HEADER_LENGTH) as usize)?;

        Ok(MidiHeader {
            format,
            tracks,
            division,
        })
    }

    /// Parse every track chunk following the header
    pub fn parse_tracks(&mut self, header: &MidiHeader) -> Result<Vec<MidiTrack>> {
        let mut tracks = Vec::with_capacity(header.tracks as usize);
        while !self.is_eof() {
            let tag = self.read_bytes(4)?;
            let length = self.read_u32_be()?;
            if tag != MTRK {
                // unknown chunk types are skipped
                self.read_bytes(length as usize)?;
                continue;
            }
            tracks.push(self.parse_track(length)?);
        }
        Ok(tracks)
    }

    /// Parse one track body of `length` bytes
    fn parse_track(&mut self, length: u32) -> Result<MidiTrack> {
        let end = self.pos + length as usize;
        if end > self.data.len() {
            return Err(Error::MidiParse(format!(
                "Track length {} runs past end of file",
                length
            )));
        }

        let mut events = Vec::new();
        let mut running_status: Option<u8> = None;

        while self.pos < end {
            let delta = self.read_vlq()?;
            let event = self.parse_event(&mut running_status)?;
            let done = event == MidiEvent::EndOfTrack;
            events.push(TrackEvent { delta, event });
            if done {
                break;
            }
        }

        if self.pos != end {
            return Err(Error::MidiParse(format!(
                "Track events end at {} but chunk ends at {}",
                self.pos, end
            )));
        }

        Ok(MidiTrack {
            declared_length: length,
            events,
        })
    }

    fn parse_event(&mut self, running_status: &mut Option<u8>) -> Result<MidiEvent> {
        let first = self.read_u8()?;

        let (status_byte, first_data) = if first & 0x80 != 0 {
            (first, None)
        } else {
            let status_byte = running_status
                .ok_or_else(|| Error::MidiParse("Data byte without running status".into()))?;
            (status_byte, Some(first))
        };

        match status_byte {
            status::META => {
                *running_status = None;
                self.parse_meta()
            }
            status::SYSEX | status::SYSEX_ESCAPE => {
                *running_status = None;
                let len = self.read_vlq()? as usize;
                Ok(MidiEvent::SysEx {
                    data: self.read_bytes(len)?,
                })
            }
            _ => {
                *running_status = Some(status_byte);
                let channel = status_byte & 0x0F;
                let data1 = match first_data {
                    Some(b) => b,
                    None => self.read_u8()?,
                };

                let event = match status_byte & 0xF0 {
                    status::NOTE_OFF => MidiEvent::NoteOff {
                        channel,
                        key: data1,
                        velocity: self.read_u8()?,
                    },
                    status::NOTE_ON => MidiEvent::NoteOn {
                        channel,
                        key: data1,
                        velocity: self.read_u8()?,
                    },
                    status::POLY_PRESSURE => MidiEvent::PolyPressure {
                        channel,
                        key: data1,
                        pressure: self.read_u8()?,
                    },
                    status::CONTROLLER => MidiEvent::Controller {
                        channel,
                        controller: data1,
                        value: self.read_u8()?,
                    },
                    status::PROGRAM_CHANGE => MidiEvent::ProgramChange {
                        channel,
                        program: data1,
                    },
                    status::CHANNEL_PRESSURE => MidiEvent::ChannelPressure {
                        channel,
                        pressure: data1,
                    },
                    status::PITCH_BEND => {
                        let msb = self.read_u8()? as u16;
                        MidiEvent::PitchBend {
                            channel,
                            value: (msb << 7) | data1 as u16,
                        }
                    }
                    _ => {
                        return Err(Error::MidiParse(format!(
                            "Unknown status byte 0x{:02X} at offset {}",
                            status_byte, self.pos
                        )))
                    }
                };
                Ok(event)
            }
        }
    }

    fn parse_meta(&mut self) -> Result<MidiEvent> {
        let kind = self.read_u8()?;
        let len = self.read_vlq()? as usize;
        let data = self.read_bytes(len)?;

        let event = match (kind, data.as_slice()) {
            (meta::END_OF_TRACK, []) => MidiEvent::EndOfTrack,
            (meta::TEMPO, [a, b, c]) => MidiEvent::Tempo {
                microseconds_per_quarter: u32::from_be_bytes([0, *a, *b, *c]),
            },
            (meta::TIME_SIGNATURE, [nn, dd, cc, bb]) => MidiEvent::TimeSignature {
                numerator: *nn,
                denominator: 1u16.checked_shl(*dd as u32).unwrap_or(0),
                clocks_per_click: *cc,
                thirty_seconds_per_quarter: *bb,
            },
            (meta::KEY_SIGNATURE, [sf, mi]) => MidiEvent::KeySignature {
                accidentals: *sf as i8,
                minor: *mi == 1,
            },
            (meta::TRACK_NAME, text) => MidiEvent::TrackName {
                text: String::from_utf8_lossy(text).into_owned(),
            },
            (meta::TEXT, text) => MidiEvent::Text {
                text: String::from_utf8_lossy(text).into_owned(),
            },
            _ => MidiEvent::Meta { kind, data },
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_track(body: &[u8]) -> Vec<u8> {
        let mut data = vec![b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 96];
        data.extend_from_slice(b"MTrk");
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_parse_header() {
        let data = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        let mut reader = MidiReader::new(&data);
        let header = reader.parse_header().unwrap();
        assert_eq!(
            header,
            MidiHeader {
                format: 1,
                tracks: 1,
                division: 96
            }
        );
    }

    #[test]
    fn test_running_status() {
        let data = file_with_track(&[
            0x00, 0x90, 60, 64, // note on
            0x00, 64, 64, // running status note on
            0x60, 60, 0, // running status release
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let mut reader = MidiReader::new(&data);
        let header = reader.parse_header().unwrap();
        let tracks = reader.parse_tracks(&header).unwrap();
        let events = &tracks[0].events;
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].event.key(), Some(64));
        assert_eq!(events[2].delta, 0x60);
        assert!(events[2].event.is_note_release());
        assert_eq!(events[3].event, MidiEvent::EndOfTrack);
    }

    #[test]
    fn test_meta_events() {
        let data = file_with_track(&[
            0x00, 0xFF, 0x58, 0x04, 3, 2, 0x24, 0x08, //
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
            0x00, 0xFF, 0x59, 0x02, 0xFE, 0x01, //
            0x00, 0xFF, 0x03, 0x02, b'H', b'i', //
            0x00, 0xFF, 0x2F, 0x00,
        ]);
        let mut reader = MidiReader::new(&data);
        let header = reader.parse_header().unwrap();
        let tracks = reader.parse_tracks(&header).unwrap();
        let events: Vec<&MidiEvent> = tracks[0].events.iter().map(|e| &e.event).collect();
        assert!(matches!(
            events[0],
            MidiEvent::TimeSignature {
                numerator: 3,
                denominator: 4,
                ..
            }
        ));
        assert_eq!(
            events[1],
            &MidiEvent::Tempo {
                microseconds_per_quarter: 500_000
            }
        );
        assert_eq!(
            events[2],
            &MidiEvent::KeySignature {
                accidentals: -2,
                minor: true
            }
        );
        assert_eq!(events[3], &MidiEvent::TrackName { text: "Hi".into() });
    }

    #[test]
    fn test_length_mismatch_detected() {
        let mut data = file_with_track(&[0x00, 0xFF, 0x2F, 0x00]);
        // declare one byte more than the events use
        data[21] = 5;
        data.push(0);
        let mut reader = MidiReader::new(&data);
        let header = reader.parse_header().unwrap();
        assert!(reader.parse_tracks(&header).is_err());
    }

    #[test]
    fn test_bad_magic() {
        let mut reader = MidiReader::new(b"RIFF\0\0\0\x06\0\x01\0\x01\0\x60");
        assert!(matches!(reader.parse_header(), Err(Error::MidiParse(_))));
    }
}
