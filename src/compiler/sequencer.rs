//! Note event sequencing for one resolved chord

use super::event::NoteEvent;
use super::resolver::ResolvedChord;

/// Velocity of every note-on
pub const VELOCITY: u8 = 64;

/// Most pitches an arpeggio plays
pub const ARPEGGIO_LIMIT: usize = 4;

/// Events for one chord in file order
///
/// A strum pattern takes precedence over the arpeggio flag.
pub fn sequence(chord: &ResolvedChord, ppq: u16) -> Vec<NoteEvent> {
    let ticks = chord.duration.ticks(ppq);

    if let Some(pattern) = &chord.pattern {
        strum(&chord.pitches, pattern, ticks)
    } else if chord.arpeggiate {
        arpeggio(&chord.pitches, chord.reverse, ticks / 2)
    } else {
        block(&chord.pitches, ticks)
    }
}

/// All pitches together, released in reverse order after `ticks`
///
/// Tones clamped onto the same key sound once.
fn block(pitches: &[u8], ticks: u32) -> Vec<NoteEvent> {
    let mut distinct: Vec<u8> = Vec::with_capacity(pitches.len());
    for p in pitches {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }

    let mut events: Vec<NoteEvent> = distinct.iter().map(|p| NoteEvent::on(0, *p, VELOCITY)).collect();
    for (i, pitch) in distinct.iter().rev().enumerate() {
        let delta = if i == 0 { ticks } else { 0 };
        events.push(NoteEvent::off(delta, *pitch));
    }
    events
}

/// The lowest pitches one at a time, each held for `step` ticks
fn arpeggio(pitches: &[u8], reverse: bool, step: u32) -> Vec<NoteEvent> {
    let mut notes = pitches.to_vec();
    notes.sort_unstable();
    notes.truncate(ARPEGGIO_LIMIT);
    if reverse {
        notes.reverse();
    }

    notes
        .into_iter()
        .flat_map(|p| [NoteEvent::on(0, p, VELOCITY), NoteEvent::off(step, p)])
        .collect()
}

/// Groups of chord-tone indices, one block per group
fn strum(pitches: &[u8], pattern: &str, ticks: u32) -> Vec<NoteEvent> {
    let mut events = Vec::new();

    for group in pattern.split('-') {
        let mut notes: Vec<u8> = Vec::new();
        for index in group.chars().filter_map(|c| c.to_digit(10)) {
            match pitches.get(index as usize) {
                Some(p) if !notes.contains(p) => notes.push(*p),
                Some(_) => {}
                None => tracing::debug!("Pattern index {} past {} pitches", index, pitches.len()),
            }
        }

        if notes.is_empty() {
            tracing::warn!("Pattern group '{}' selects no pitches, skipped", group);
            continue;
        }
        events.extend(block(&notes, ticks));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::event::{NoteAction, NoteValue};

    fn chord(pitches: &[u8]) -> ResolvedChord {
        ResolvedChord {
            pitches: pitches.to_vec(),
            arpeggiate: false,
            reverse: false,
            duration: NoteValue::Half,
            pattern: None,
        }
    }

    fn summary(events: &[NoteEvent]) -> Vec<(u32, bool, u8)> {
        events
            .iter()
            .map(|e| (e.delta, e.action == NoteAction::On, e.pitch))
            .collect()
    }

    #[test]
    fn test_block() {
        let events = sequence(&chord(&[48, 52, 55]), 96);
        assert_eq!(
            summary(&events),
            vec![
                (0, true, 48),
                (0, true, 52),
                (0, true, 55),
                (192, false, 55),
                (0, false, 52),
                (0, false, 48),
            ]
        );
        assert!(events[..3].iter().all(|e| e.velocity == VELOCITY));
        assert!(events[3..].iter().all(|e| e.velocity == 0));
    }

    #[test]
    fn test_block_collapses_clamped_tones() {
        let events = sequence(&chord(&[120, 127, 127, 127]), 96);
        assert_eq!(
            summary(&events),
            vec![(0, true, 120), (0, true, 127), (192, false, 127), (0, false, 120)]
        );
    }

    #[test]
    fn test_block_duration() {
        let mut c = chord(&[60]);
        c.duration = NoteValue::DottedQuarter;
        let events = sequence(&c, 480);
        assert_eq!(events[1].delta, 720);
    }

    #[test]
    fn test_arpeggio_lowest_four() {
        let mut c = chord(&[60, 36, 55, 43, 48, 52]);
        c.arpeggiate = true;
        c.duration = NoteValue::Quarter;
        assert_eq!(
            summary(&sequence(&c, 96)),
            vec![
                (0, true, 36),
                (48, false, 36),
                (0, true, 43),
                (48, false, 43),
                (0, true, 48),
                (48, false, 48),
                (0, true, 52),
                (48, false, 52),
            ]
        );
    }

    #[test]
    fn test_arpeggio_reversed() {
        let mut c = chord(&[40, 47, 52]);
        c.arpeggiate = true;
        c.reverse = true;
        let pitches: Vec<u8> = sequence(&c, 96)
            .iter()
            .filter(|e| e.action == NoteAction::On)
            .map(|e| e.pitch)
            .collect();
        assert_eq!(pitches, vec![52, 47, 40]);
    }

    #[test]
    fn test_pattern_groups() {
        let mut c = chord(&[40, 47, 52, 56]);
        c.pattern = Some("03-1".into());
        c.duration = NoteValue::Eighth;
        assert_eq!(
            summary(&sequence(&c, 96)),
            vec![
                (0, true, 40),
                (0, true, 56),
                (48, false, 56),
                (0, false, 40),
                (0, true, 47),
                (48, false, 47),
            ]
        );
    }

    #[test]
    fn test_pattern_out_of_range_indices() {
        let mut c = chord(&[40, 47]);
        c.arpeggiate = true;
        c.pattern = Some("09-8-1".into());
        let events = sequence(&c, 96);
        // "8" selects nothing and is skipped; the pattern wins over the arpeggio
        assert_eq!(
            summary(&events),
            vec![(0, true, 40), (192, false, 40), (0, true, 47), (192, false, 47)]
        );
    }

    #[test]
    fn test_fallback_single_note() {
        let events = sequence(&chord(&[76]), 96);
        assert_eq!(summary(&events), vec![(0, true, 76), (192, false, 76)]);
    }
}
