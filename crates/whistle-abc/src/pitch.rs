//! ABC note tokens and project pitches.
//!
//! A project pitch is a MIDI note number minus 20. Uppercase letters sit in
//! MIDI octave 4 (`C` = 60 = pitch 40), lowercase letters in octave 5, and each
//! `'` or `,` moves one octave up or down. Pitches are computed rather than
//! looked up in a fixed table, so any single-accidental token maps as long as
//! the result lands in [`PITCH_MIN`, `PITCH_MAX`].

use std::fmt;

use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::model::{Accidental, NoteName, MIDI_OFFSET, PITCH_MAX, PITCH_MIN};

/// Pitches that need a half-covered hole on a D whistle.
pub const HALF_HOLED: [u8; 10] = [55, 57, 60, 62, 64, 67, 69, 72, 74, 76];

pub fn is_half_holed(pitch: u8) -> bool {
    HALF_HOLED.contains(&pitch)
}

/// A single note as written: optional accidental, letter, octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteToken {
    pub accidental: Option<Accidental>,
    pub name: NoteName,
    /// 0 = C-B, 1 = c-b, -1 = C,-B,
    pub octave: i8,
}

impl NoteToken {
    pub fn new(name: NoteName, octave: i8) -> Self {
        NoteToken {
            accidental: None,
            name,
            octave,
        }
    }

    pub fn with_accidental(self, accidental: Option<Accidental>) -> Self {
        NoteToken { accidental, ..self }
    }

    /// Project pitch, or `None` when the note falls outside the pitch table.
    pub fn pitch(&self) -> Option<u8> {
        let acc = self.accidental.map(|a| a.to_semitone_offset()).unwrap_or(0);
        // ABC octave 0 is MIDI octave 4, which starts at note 60
        let midi = 60 + 12 * self.octave as i32 + self.name.to_semitone() as i32 + acc as i32;
        let pitch = midi - MIDI_OFFSET as i32;

        if (PITCH_MIN as i32..=PITCH_MAX as i32).contains(&pitch) {
            Some(pitch as u8)
        } else {
            None
        }
    }

    /// Spell a project pitch as an ABC token, preferring sharps.
    pub fn from_pitch(pitch: u8) -> Option<NoteToken> {
        if !(PITCH_MIN..=PITCH_MAX).contains(&pitch) {
            return None;
        }
        let midi = pitch as i32 + MIDI_OFFSET as i32;
        let (name, accidental) = match midi.rem_euclid(12) {
            0 => (NoteName::C, None),
            1 => (NoteName::C, Some(Accidental::Sharp)),
            2 => (NoteName::D, None),
            3 => (NoteName::D, Some(Accidental::Sharp)),
            4 => (NoteName::E, None),
            5 => (NoteName::F, None),
            6 => (NoteName::F, Some(Accidental::Sharp)),
            7 => (NoteName::G, None),
            8 => (NoteName::G, Some(Accidental::Sharp)),
            9 => (NoteName::A, None),
            10 => (NoteName::A, Some(Accidental::Sharp)),
            _ => (NoteName::B, None),
        };
        let octave = (midi.div_euclid(12) - 5) as i8;
        Some(NoteToken {
            accidental,
            name,
            octave,
        })
    }
}

impl fmt::Display for NoteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(acc) = self.accidental {
            write!(f, "{}", acc.as_abc())?;
        }
        let letter = self.name.as_char();
        if self.octave >= 1 {
            write!(f, "{}", letter.to_ascii_lowercase())?;
            for _ in 1..self.octave {
                f.write_str("'")?;
            }
        } else {
            write!(f, "{}", letter)?;
            for _ in self.octave..0 {
                f.write_str(",")?;
            }
        }
        Ok(())
    }
}

/// Parse an accidental prefix (^, _, =)
pub fn parse_accidental(input: &mut &str) -> ModalResult<Accidental> {
    one_of(['^', '_', '='])
        .map(|c| Accidental::from_abc(c).unwrap_or(Accidental::Natural))
        .parse_next(input)
}

/// Parse a note letter and its base octave.
/// Uppercase = octave 0, lowercase = octave 1
pub fn parse_letter(input: &mut &str) -> ModalResult<(NoteName, i8)> {
    let c = one_of(['C', 'D', 'E', 'F', 'G', 'A', 'B', 'c', 'd', 'e', 'f', 'g', 'a', 'b'])
        .parse_next(input)?;
    let name = NoteName::from_char(c).unwrap_or(NoteName::C);
    let octave = if c.is_ascii_lowercase() { 1 } else { 0 };
    Ok((name, octave))
}

/// Parse octave marks (', ,) in any order
pub fn parse_octave_marks(input: &mut &str) -> ModalResult<i8> {
    let marks: &str = take_while(0.., ['\'', ',']).parse_next(input)?;
    Ok(marks
        .chars()
        .map(|c| if c == '\'' { 1i8 } else { -1 })
        .fold(0i8, |acc, step| acc.saturating_add(step)))
}

/// Parse a complete note token (accidental, letter, octave marks)
pub fn parse_note_token(input: &mut &str) -> ModalResult<NoteToken> {
    let accidental = opt(parse_accidental).parse_next(input)?;
    let (name, base_octave) = parse_letter(input)?;
    let marks = parse_octave_marks(input)?;
    Ok(NoteToken {
        accidental,
        name,
        octave: base_octave.saturating_add(marks),
    })
}

/// Look up the project pitch of a whole ABC token such as `^f`, `B,` or `e''`.
///
/// Returns `None` for malformed tokens and for notes outside the pitch table.
pub fn lookup(token: &str) -> Option<u8> {
    let token = parse_note_token.parse(token).ok()?;
    token.pitch()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_naturals() {
        assert_eq!(lookup("C,"), Some(28));
        assert_eq!(lookup("B,"), Some(39));
        assert_eq!(lookup("C"), Some(40));
        assert_eq!(lookup("D"), Some(42));
        assert_eq!(lookup("c"), Some(52));
        assert_eq!(lookup("d"), Some(54));
        assert_eq!(lookup("b"), Some(63));
        assert_eq!(lookup("c'"), Some(64));
        assert_eq!(lookup("d''"), Some(78));
        assert_eq!(lookup("e''"), Some(80));
    }

    #[test]
    fn test_lookup_accidentals() {
        assert_eq!(lookup("^C"), Some(41));
        assert_eq!(lookup("_D"), Some(41));
        assert_eq!(lookup("=F"), Some(45));
        assert_eq!(lookup("^f"), Some(58));
        assert_eq!(lookup("_b"), Some(62));
        assert_eq!(lookup("^c'"), Some(65));
        // combinations the old fixed table never listed
        assert_eq!(lookup("^C,"), Some(29));
        assert_eq!(lookup("_e''"), Some(79));
    }

    #[test]
    fn test_lookup_out_of_table() {
        assert_eq!(lookup("_C,"), None);
        assert_eq!(lookup("C,,"), None);
        assert_eq!(lookup("^e''"), None);
        assert_eq!(lookup("f''"), None);
    }

    #[test]
    fn test_lookup_malformed() {
        assert_eq!(lookup(""), None);
        assert_eq!(lookup("H"), None);
        assert_eq!(lookup("^^C"), None);
        assert_eq!(lookup("C2"), None);
    }

    #[test]
    fn test_octave_marks_cancel() {
        assert_eq!(lookup("c',"), lookup("c"));
    }

    #[test]
    fn test_from_pitch_round_trips() {
        for pitch in PITCH_MIN..=PITCH_MAX {
            let token = NoteToken::from_pitch(pitch).unwrap();
            assert_eq!(lookup(&token.to_string()), Some(pitch), "token {}", token);
        }
        assert_eq!(NoteToken::from_pitch(0), None);
        assert_eq!(NoteToken::from_pitch(54).unwrap().to_string(), "d");
        assert_eq!(NoteToken::from_pitch(29).unwrap().to_string(), "^C,");
    }

    #[test]
    fn test_half_holed() {
        assert!(is_half_holed(57));
        assert!(!is_half_holed(58));
        assert!(!is_half_holed(54));
    }
}
