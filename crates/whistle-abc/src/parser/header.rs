//! Header field handling for ABC notation.
//!
//! Headers may appear anywhere in the text. Each one updates the parser
//! state from that line on; notes already emitted are never revisited.

use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};
use crate::key::Key;
use crate::tempo::{parse_unit_length, Tempo};

use super::ParserState;

/// Apply one `X:value` header line to the parser state.
pub fn apply_header(
    state: &mut ParserState,
    field: char,
    value: &str,
    line_num: usize,
    sink: &mut dyn FeedbackSink,
) {
    let value = value.trim();

    match field {
        'T' => {
            if state.title.is_none() {
                state.title = Some(value.to_string());
            }
        }
        'K' => apply_key(state, value, line_num, sink),
        'M' => {
            state.meter = value.to_string();
        }
        'L' => match parse_unit_length(value) {
            Some(length) => state.default_length = length,
            None => invalid(sink, field, value, line_num, "unit length"),
        },
        'Q' => match Tempo::parse(value) {
            Some(tempo) => state.tempo = tempo,
            None => invalid(sink, field, value, line_num, "tempo"),
        },
        _ => {}
    }
}

/// Only the first word names the key; anything after it ("E minor",
/// "clef=bass") is ignored.
fn apply_key(state: &mut ParserState, value: &str, line_num: usize, sink: &mut dyn FeedbackSink) {
    let name = value.split_whitespace().next().unwrap_or("");

    match Key::parse(name) {
        Some(key) => state.key_accidentals = key.accidentals(),
        None => {
            state.key_accidentals = Default::default();
            if !name.is_empty() && !name.eq_ignore_ascii_case("none") {
                invalid(sink, 'K', name, line_num, "key");
            }
        }
    }

    state.key = name.to_string();
}

fn invalid(sink: &mut dyn FeedbackSink, field: char, value: &str, line_num: usize, what: &str) {
    sink.report(
        Feedback::warning(
            FeedbackKind::InvalidHeader {
                field,
                value: value.to_string(),
            },
            format!("Ignoring invalid {} '{}'", what, value),
        )
        .at(line_num, 1),
    );
}
