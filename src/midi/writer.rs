//! Single-track SMF encoder

use super::header::{
    meta, status, HeaderChunk, CLOCKS_PER_CLICK, MAX_DIVISION, MTRK, PROGRAM_CHANNEL,
    THIRTY_SECONDS_PER_QUARTER,
};
use super::vlq;
use crate::error::{Error, Result};
use crate::tone::KeySignature;
use std::fmt;
use std::io::Write;

/// Microseconds in a minute, for bpm to tempo conversion
pub const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

/// Largest value of the 24-bit tempo field
const MAX_TEMPO: u32 = 0xFF_FFFF;

/// Time signature as numerator over a power-of-two denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    /// Parse "N/D"
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::TimeSignature(s.to_string());
        let (num, denom) = s.trim().split_once('/').ok_or_else(invalid)?;
        let numerator: u8 = num.trim().parse().map_err(|_| invalid())?;
        let denominator: u8 = denom.trim().parse().map_err(|_| invalid())?;

        if numerator == 0 || !denominator.is_power_of_two() {
            return Err(invalid());
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Denominator as a power of two, as stored in the meta event
    pub fn denominator_log2(&self) -> u8 {
        self.denominator.trailing_zeros() as u8
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Microseconds per quarter note for a tempo in beats per minute
pub fn tempo_from_bpm(bpm: u32) -> Result<u32> {
    if bpm == 0 {
        return Err(Error::Tempo(bpm));
    }
    let tempo = MICROSECONDS_PER_MINUTE / bpm;
    if tempo == 0 || tempo > MAX_TEMPO {
        return Err(Error::Tempo(bpm));
    }
    Ok(tempo)
}

/// File-level settings written as meta events at the start of the track
#[derive(Debug, Clone)]
pub struct TrackMeta<'a> {
    pub title: &'a str,
    pub time_signature: TimeSignature,
    pub tempo_bpm: u32,
    pub key: &'a KeySignature,
    pub program: u8,
}

/// Encoder phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Track,
    Finished,
}

/// Accumulates one track and emits a complete single-track file
///
/// Token event bytes are kept as separate segments so the chunk length can
/// be summed before anything is emitted.
#[derive(Debug)]
pub struct TrackEncoder {
    phase: Phase,
    header: HeaderChunk,
    meta: Vec<u8>,
    segments: Vec<Vec<u8>>,
}

impl TrackEncoder {
    pub fn new(division: u16) -> Result<Self> {
        if division == 0 || division > MAX_DIVISION {
            return Err(Error::Division(division));
        }
        Ok(Self {
            phase: Phase::Header,
            header: HeaderChunk::new(1, division),
            meta: Vec::new(),
            segments: Vec::new(),
        })
    }

    /// Write the leading meta events and the program change
    pub fn begin_track(&mut self, track: &TrackMeta<'_>) -> Result<()> {
        self.expect_phase(Phase::Header, "begin_track")?;

        let ts = track.time_signature;
        self.push_meta(
            meta::TIME_SIGNATURE,
            &[
                ts.numerator,
                ts.denominator_log2(),
                CLOCKS_PER_CLICK,
                THIRTY_SECONDS_PER_QUARTER,
            ],
        )?;

        let tempo = tempo_from_bpm(track.tempo_bpm)?;
        self.push_meta(meta::TEMPO, &tempo.to_be_bytes()[1..])?;

        // two's complement for flats
        self.push_meta(
            meta::KEY_SIGNATURE,
            &[track.key.accidentals() as u8, track.key.mode().as_byte()],
        )?;

        self.push_meta(meta::TRACK_NAME, track.title.as_bytes())?;

        self.meta.extend_from_slice(&[
            0x00,
            status::PROGRAM_CHANGE | PROGRAM_CHANNEL,
            track.program & 0x7F,
        ]);

        self.phase = Phase::Track;
        Ok(())
    }

    /// Append the encoded events of one token
    pub fn push_segment(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.expect_phase(Phase::Track, "push_segment")?;
        self.segments.push(bytes);
        Ok(())
    }

    /// Number of token segments accumulated so far
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Append end-of-track; no events may follow
    pub fn finish(&mut self) -> Result<()> {
        self.expect_phase(Phase::Track, "finish")?;
        self.segments
            .push(vec![0x00, status::META, meta::END_OF_TRACK, 0x00]);
        self.phase = Phase::Finished;
        Ok(())
    }

    /// Byte count of the track chunk body
    pub fn track_length(&self) -> usize {
        self.meta.len() + self.segments.iter().map(Vec::len).sum::<usize>()
    }

    /// Emit header chunk and track chunk
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        self.expect_phase(Phase::Finished, "write_to")?;

        let length = u32::try_from(self.track_length())
            .map_err(|_| Error::Encoder("Track chunk exceeds 4 GiB".into()))?;

        out.write_all(&self.header.to_bytes())?;
        out.write_all(MTRK)?;
        out.write_all(&length.to_be_bytes())?;
        out.write_all(&self.meta)?;
        for segment in &self.segments {
            out.write_all(segment)?;
        }
        Ok(())
    }

    /// Complete file as a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(22 + self.track_length());
        self.write_to(&mut data)?;
        Ok(data)
    }

    fn push_meta(&mut self, kind: u8, data: &[u8]) -> Result<()> {
        self.meta.extend_from_slice(&[0x00, status::META, kind]);
        self.meta.extend_from_slice(&vlq::encode(data.len() as u32)?);
        self.meta.extend_from_slice(data);
        Ok(())
    }

    fn expect_phase(&self, phase: Phase, op: &str) -> Result<()> {
        if self.phase != phase {
            return Err(Error::Encoder(format!(
                "{} called in {:?} phase, expected {:?}",
                op, self.phase, phase
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> KeySignature {
        KeySignature::parse("Cmaj").unwrap()
    }

    fn meta_for(key: &KeySignature) -> TrackMeta<'_> {
        TrackMeta {
            title: "Test",
            time_signature: TimeSignature::default(),
            tempo_bpm: 120,
            key,
            program: 24,
        }
    }

    #[test]
    fn test_time_signature_parse() {
        let ts = TimeSignature::parse("6/8").unwrap();
        assert_eq!(ts.numerator, 6);
        assert_eq!(ts.denominator_log2(), 3);
        assert!(TimeSignature::parse("4").is_err());
        assert!(TimeSignature::parse("4/3").is_err());
        assert!(TimeSignature::parse("0/4").is_err());
        assert!(TimeSignature::parse("a/4").is_err());
    }

    #[test]
    fn test_tempo() {
        assert_eq!(tempo_from_bpm(120).unwrap(), 500_000);
        assert_eq!(tempo_from_bpm(60).unwrap(), 1_000_000);
        assert!(tempo_from_bpm(0).is_err());
        assert!(tempo_from_bpm(3).is_err());
    }

    #[test]
    fn test_empty_track_layout() {
        let key = c_major();
        let mut encoder = TrackEncoder::new(96).unwrap();
        encoder.begin_track(&meta_for(&key)).unwrap();
        encoder.finish().unwrap();
        let data = encoder.to_bytes().unwrap();

        assert_eq!(&data[0..4], b"MThd");
        assert_eq!(&data[14..18], b"MTrk");
        let length = u32::from_be_bytes([data[18], data[19], data[20], data[21]]) as usize;
        assert_eq!(length, data.len() - 22);

        let body = &data[22..];
        assert_eq!(&body[0..8], &[0x00, 0xFF, 0x58, 0x04, 4, 2, 0x24, 0x08]);
        assert_eq!(&body[8..15], &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(&body[15..21], &[0x00, 0xFF, 0x59, 0x02, 0x00, 0x00]);
        assert_eq!(&body[21..29], &[0x00, 0xFF, 0x03, 0x04, b'T', b'e', b's', b't']);
        assert_eq!(&body[29..32], &[0x00, 0xC1, 24]);
        assert_eq!(&body[32..], &[0x00, 0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_flat_key_twos_complement() {
        let key = KeySignature::parse("Ebmaj").unwrap();
        let mut encoder = TrackEncoder::new(96).unwrap();
        encoder.begin_track(&meta_for(&key)).unwrap();
        encoder.finish().unwrap();
        let data = encoder.to_bytes().unwrap();
        let body = &data[22..];
        assert_eq!(&body[15..21], &[0x00, 0xFF, 0x59, 0x02, 0xFD, 0x00]);
    }

    #[test]
    fn test_segments_counted_in_length() {
        let key = c_major();
        let mut encoder = TrackEncoder::new(96).unwrap();
        encoder.begin_track(&meta_for(&key)).unwrap();
        let before = encoder.track_length();
        encoder.push_segment(vec![0x00, 0x90, 60, 64]).unwrap();
        encoder.push_segment(vec![0x60, 0x90, 60, 0]).unwrap();
        assert_eq!(encoder.track_length(), before + 8);
        assert_eq!(encoder.segment_count(), 2);
    }

    #[test]
    fn test_phase_order_enforced() {
        let key = c_major();
        let mut encoder = TrackEncoder::new(96).unwrap();
        assert!(matches!(encoder.push_segment(vec![0]), Err(Error::Encoder(_))));
        assert!(encoder.to_bytes().is_err());
        encoder.begin_track(&meta_for(&key)).unwrap();
        assert!(encoder.begin_track(&meta_for(&key)).is_err());
        encoder.finish().unwrap();
        assert!(encoder.push_segment(vec![0]).is_err());
        assert!(encoder.finish().is_err());
    }

    #[test]
    fn test_invalid_division() {
        assert!(matches!(TrackEncoder::new(0), Err(Error::Division(0))));
        assert!(TrackEncoder::new(0x8000).is_err());
    }
}
