//! ABC notation parser using winnow.
//!
//! The parser is generous: anything it does not understand is skipped and
//! reported as feedback. Only an empty input or a tune without a single
//! note is an error.

mod body;
mod header;
mod note;

pub use body::{base_pitch, resolve_pitch, scan_line, BodyToken, Scanned};
pub use note::{parse_length, LengthModifier};

use crate::error::ParseError;
use crate::feedback::FeedbackSink;
use crate::key::KeyAccidentals;
use crate::model::{Note, ParseResult};
use crate::tempo::{Length, Tempo};

/// Everything the parser tracks while walking the text.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub title: Option<String>,
    /// Key name as written (first word of the last `K:` seen)
    pub key: String,
    pub meter: String,
    pub default_length: Length,
    pub tempo: Tempo,
    pub key_accidentals: KeyAccidentals,
    pub notes: Vec<Note>,
}

impl ParserState {
    /// Milliseconds for a note written with `length` after the current `L:`.
    pub fn duration_ms(&self, length: LengthModifier) -> u32 {
        let units = self
            .default_length
            .scale(length.multiplier, length.divisor);
        self.tempo.duration_ms(units)
    }

    fn finish(self) -> ParseResult {
        ParseResult {
            notes: self.notes,
            title: self.title.unwrap_or_default(),
            key: self.key,
            meter: self.meter,
            tempo_bpm: self.tempo.bpm,
        }
    }
}

/// How a single trimmed line of ABC text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    Header { field: char, value: &'a str },
    Body(&'a str),
}

/// Classify one line. The line is trimmed first.
pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('%') {
        return Line::Comment;
    }

    let mut chars = trimmed.chars();
    if let (Some(field), Some(':')) = (chars.next(), chars.next()) {
        if field.is_ascii_uppercase() {
            return Line::Header {
                field,
                value: &trimmed[2..],
            };
        }
    }

    Line::Body(trimmed)
}

/// Remove ornament markers. Done once before any line is looked at.
pub fn strip_ornaments(input: &str) -> String {
    input.replace('~', "")
}

/// Parse ABC notation into notes plus the tune's title, key, meter and tempo.
pub fn parse(input: &str, sink: &mut dyn FeedbackSink) -> Result<ParseResult, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let text = strip_ornaments(input);
    let mut state = ParserState::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_num = idx + 1;
        match classify(raw) {
            Line::Blank | Line::Comment => {}
            Line::Header { field, value } => {
                header::apply_header(&mut state, field, value, line_num, sink)
            }
            Line::Body(line) => body::parse_body_line(&mut state, line, line_num, sink),
        }
    }

    if state.notes.is_empty() {
        return Err(ParseError::NoNotes);
    }

    tracing::debug!(
        notes = state.notes.len(),
        key = %state.key,
        bpm = state.tempo.bpm,
        "parsed ABC body"
    );

    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackCollector, NoopSink};

    fn parse_quiet(input: &str) -> Result<ParseResult, ParseError> {
        parse(input, &mut NoopSink)
    }

    fn pitches(result: &ParseResult) -> Vec<u8> {
        result.notes.iter().map(|n| n.pitch).collect()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("% comment"), Line::Comment);
        assert_eq!(
            classify("T:Title"),
            Line::Header {
                field: 'T',
                value: "Title"
            }
        );
        assert_eq!(classify("  K: G "), Line::Header { field: 'K', value: " G" });
        // lowercase fields and bar-colon sequences are music
        assert_eq!(classify("w:words"), Line::Body("w:words"));
        assert_eq!(classify("|:DEF:|"), Line::Body("|:DEF:|"));
    }

    #[test]
    fn test_parse_minimal() {
        let result = parse_quiet("X:1\nT:Test\nK:C\nCDEF|").unwrap();
        assert_eq!(result.title, "Test");
        assert_eq!(result.key, "C");
        assert_eq!(result.meter, "");
        assert_eq!(result.tempo_bpm, 120);
        assert_eq!(pitches(&result), vec![40, 42, 44, 45]);
    }

    #[test]
    fn test_parse_without_headers() {
        let result = parse_quiet("DEF").unwrap();
        assert_eq!(result.title, "");
        assert_eq!(result.key, "");
        assert_eq!(result.notes.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_quiet(""), Err(ParseError::EmptyInput));
        assert_eq!(parse_quiet(" \n\t\r\n"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_no_notes() {
        assert_eq!(
            parse_quiet("X:1\nT:Nothing\nK:D\n% just a comment\n| : |"),
            Err(ParseError::NoNotes)
        );
    }

    #[test]
    fn test_ornaments_are_stripped() {
        let result = parse_quiet("K:D\n~d2 ~e").unwrap();
        assert_eq!(pitches(&result), vec![54, 56]);
    }

    #[test]
    fn test_carriage_returns_tolerated() {
        let result = parse_quiet("T:Crlf\r\nK:G\r\nGAB\r\n").unwrap();
        assert_eq!(result.title, "Crlf");
        assert_eq!(result.key, "G");
        assert_eq!(result.notes.len(), 3);
    }

    #[test]
    fn test_key_change_is_not_retroactive() {
        let result = parse_quiet("K:C\nF\nK:G\nF\nK:F\nB").unwrap();
        assert_eq!(pitches(&result), vec![45, 46, 50]);
        assert_eq!(result.key, "F");
    }

    #[test]
    fn test_key_mode_word_does_not_change_signature() {
        // "E minor" is read as E, so C is sharpened
        let result = parse_quiet("K:E minor\nC").unwrap();
        assert_eq!(result.key, "E");
        assert_eq!(pitches(&result), vec![41]);
    }

    #[test]
    fn test_uppercase_flat_key() {
        let result = parse_quiet("K:BB\nB E").unwrap();
        assert_eq!(pitches(&result), vec![50, 43]);
    }

    #[test]
    fn test_explicit_accidental_for_one_note_only() {
        let result = parse_quiet("K:D\n=F F ^c c _c").unwrap();
        assert_eq!(pitches(&result), vec![45, 46, 53, 53, 51]);
    }

    #[test]
    fn test_unit_length_changes_durations() {
        let result = parse_quiet("L:1/4\nK:C\nC C/ C2").unwrap();
        let durations: Vec<_> = result.notes.iter().map(|n| n.duration_ms).collect();
        assert_eq!(durations, vec![500, 250, 1000]);
    }

    #[test]
    fn test_tempo_changes_durations() {
        let result = parse_quiet("Q:1/4=60\nK:C\nC").unwrap();
        assert_eq!(result.notes[0].duration_ms, 500);
        assert_eq!(result.tempo_bpm, 60);
    }

    #[test]
    fn test_skipped_tokens_are_reported() {
        let mut sink = FeedbackCollector::new();
        let result = parse("K:C\nC,, D\n", &mut sink).unwrap();
        assert_eq!(pitches(&result), vec![42]);

        let feedback = sink.into_feedback();
        assert_eq!(feedback.len(), 1);
        assert_eq!((feedback[0].line, feedback[0].column), (2, 1));
    }

    #[test]
    fn test_chords_and_decorations_do_not_stop_parsing() {
        let result = parse_quiet("K:G\n!trill!G2 (AB) | \"D\"d4 |]").unwrap();
        assert_eq!(result.notes.len(), 4);
    }
}
