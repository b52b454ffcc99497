//! Music body scanning for ABC notation.
//!
//! One left-to-right pass per line. Bar lines, repeat marks and braces are
//! treated as spaces, quoted chord symbols and `!...!` decorations are
//! dropped whole, and anything else that is not a note, a rest or a length
//! is skipped. The renderer counts tokens with the same scanner so that its
//! line breaks line up with the notes the parser produced.

use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};
use crate::key::KeyAccidentals;
use crate::model::Note;
use crate::pitch::{parse_note_token, NoteToken};

use super::note::{parse_length, LengthModifier};
use super::ParserState;

/// A note-producing token found in a body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyToken {
    Rest(LengthModifier),
    Note {
        token: NoteToken,
        length: LengthModifier,
    },
}

impl BodyToken {
    /// Whether the parser emits a note for this token.
    pub fn produces_note(&self) -> bool {
        match self {
            BodyToken::Rest(_) => true,
            BodyToken::Note { token, .. } => base_pitch(token).is_some(),
        }
    }
}

/// A token with its position and source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned<'a> {
    /// 1-based byte column within the line
    pub column: usize,
    /// Note text without its length suffix (e.g. `^f'`)
    pub text: &'a str,
    pub token: BodyToken,
}

/// Characters that structure the tune but carry no notes
fn is_structural(c: char) -> bool {
    matches!(c, '|' | ':' | '[' | ']' | '{' | '}')
}

fn is_accidental(c: char) -> bool {
    matches!(c, '^' | '_' | '=')
}

fn is_note_letter(c: char) -> bool {
    matches!(c, 'A'..='G' | 'a'..='g')
}

/// Scan one body line into its note and rest tokens.
pub fn scan_line(line: &str) -> Vec<Scanned<'_>> {
    let mut tokens = Vec::new();
    let mut input = line;

    while let Some(c) = input.chars().next() {
        let start = line.len() - input.len();

        if c.is_whitespace() || is_structural(c) {
            input = &input[c.len_utf8()..];
            continue;
        }

        if c == '"' || c == '!' {
            // unterminated: drop just the delimiter
            input = match input[1..].find(c) {
                Some(end) => &input[end + 2..],
                None => &input[1..],
            };
            continue;
        }

        if c == 'z' || c == 'x' {
            input = &input[1..];
            let length = parse_length(&mut input).unwrap_or_default();
            tokens.push(Scanned {
                column: start + 1,
                text: &line[start..start + 1],
                token: BodyToken::Rest(length),
            });
            continue;
        }

        let starts_note = is_note_letter(c)
            || (is_accidental(c) && input[1..].chars().next().is_some_and(is_note_letter));
        if starts_note {
            let mut rest = input;
            if let Ok(token) = parse_note_token(&mut rest) {
                input = rest;
                let end = line.len() - input.len();
                let length = parse_length(&mut input).unwrap_or_default();
                tokens.push(Scanned {
                    column: start + 1,
                    text: &line[start..end],
                    token: BodyToken::Note { token, length },
                });
                continue;
            }
        }

        // Anything else (decorations, slurs, chord symbols...) is skipped
        input = &input[c.len_utf8()..];
    }

    tokens
}

/// Pitch of a token before the key signature, falling back to the bare
/// letter when the accidental pushes it out of the table.
pub fn base_pitch(token: &NoteToken) -> Option<u8> {
    token
        .pitch()
        .or_else(|| token.with_accidental(None).pitch())
}

/// Final pitch of a token: explicit accidentals win, otherwise the key applies.
pub fn resolve_pitch(token: &NoteToken, key: &KeyAccidentals) -> Option<u8> {
    let base = base_pitch(token)?;
    if token.accidental.is_some() {
        return Some(base);
    }

    let pitch = key
        .accidental(token.name)
        .and_then(|acc| token.with_accidental(Some(acc)).pitch())
        .unwrap_or(base);
    Some(pitch)
}

/// Parse one body line, appending its notes to the parser state.
pub fn parse_body_line(
    state: &mut ParserState,
    line: &str,
    line_num: usize,
    sink: &mut dyn FeedbackSink,
) {
    for scanned in scan_line(line) {
        match scanned.token {
            BodyToken::Rest(length) => {
                let duration = state.duration_ms(length);
                state.notes.push(Note::rest(duration));
            }
            BodyToken::Note { token, length } => {
                match resolve_pitch(&token, &state.key_accidentals) {
                    Some(pitch) => {
                        let duration = state.duration_ms(length);
                        state.notes.push(Note::new(pitch, duration));
                    }
                    None => sink.report(
                        Feedback::debug(
                            FeedbackKind::TokenSkipped {
                                token: scanned.text.to_string(),
                            },
                            format!("Skipping note '{}' outside the pitch table", scanned.text),
                        )
                        .at(line_num, scanned.column),
                    ),
                }
            }
        }
    }
}
