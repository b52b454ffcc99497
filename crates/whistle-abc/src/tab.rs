//! Whistle fingerings and tablature rendering.
//!
//! Every pitch a D whistle can play has a six-hole fingering. A tablature
//! glyph is one character per fingering: note letters for plain fingerings
//! (lowercase in the first octave, uppercase when overblown), digits for the
//! half-holed ones, and `*` for the top d''.

use std::fmt;

use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};
use crate::model::Note;
use crate::parser::{classify, scan_line, strip_ornaments, Line};
use crate::pitch::{NoteToken, HALF_HOLED};
use crate::transpose::{WHISTLE_MAX, WHISTLE_MIN};

/// Glyph for pitches the whistle cannot play.
pub const UNPLAYABLE: char = '?';

/// Glyphs for the half-holed pitches, in [`HALF_HOLED`] order.
const HALF_HOLED_GLYPHS: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

/// Notes this long get two spaces after their glyph.
pub const LONG_NOTE_MS: u32 = 800;

/// Notes this long get one space after their glyph.
pub const MEDIUM_NOTE_MS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hole {
    Closed,
    Half,
    Open,
}

use Hole::{Closed as X, Half as H, Open as O};

/// Holes from the top (nearest the mouthpiece) down, plus whether to overblow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingering {
    pub holes: [Hole; 6],
    pub overblown: bool,
}

impl Fingering {
    pub fn is_half_holed(&self) -> bool {
        self.holes.contains(&Hole::Half)
    }
}

impl fmt::Display for Fingering {
    /// `XXXOOO` style, `/` for a half hole, `+` when overblown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hole in self.holes {
            let c = match hole {
                Hole::Closed => 'X',
                Hole::Half => '/',
                Hole::Open => 'O',
            };
            write!(f, "{}", c)?;
        }
        if self.overblown {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// First-octave fingerings, d up to c#'.
const LOW_OCTAVE: [[Hole; 6]; 12] = [
    [X, X, X, X, X, X], // d
    [X, X, X, X, X, H], // d#
    [X, X, X, X, X, O], // e
    [X, X, X, X, H, O], // f
    [X, X, X, X, O, O], // f#
    [X, X, X, O, O, O], // g
    [X, X, H, O, O, O], // g#
    [X, X, O, O, O, O], // a
    [X, H, O, O, O, O], // bb
    [X, O, O, O, O, O], // b
    [H, O, O, O, O, O], // c
    [O, O, O, O, O, O], // c#
];

/// Fingering for a project pitch, or `None` outside the whistle's range.
pub fn fingering(pitch: u8) -> Option<Fingering> {
    if !(WHISTLE_MIN..=WHISTLE_MAX).contains(&pitch) {
        return None;
    }

    let offset = (pitch - WHISTLE_MIN) as usize;
    let fingering = match offset {
        0..=11 => Fingering {
            holes: LOW_OCTAVE[offset],
            overblown: false,
        },
        12..=23 => Fingering {
            holes: LOW_OCTAVE[offset - 12],
            overblown: true,
        },
        _ => Fingering {
            holes: [O, X, X, X, X, X],
            overblown: true,
        },
    };
    Some(fingering)
}

/// Tablature glyph for a project pitch.
pub fn glyph(pitch: u8) -> char {
    let Some(fingering) = fingering(pitch) else {
        return UNPLAYABLE;
    };

    if fingering.is_half_holed() {
        return HALF_HOLED
            .iter()
            .position(|&p| p == pitch)
            .map(|i| HALF_HOLED_GLYPHS[i])
            .unwrap_or(UNPLAYABLE);
    }
    if pitch == WHISTLE_MAX {
        return '*';
    }

    match NoteToken::from_pitch(pitch) {
        Some(token) if fingering.overblown => token.name.as_char(),
        Some(token) => token.name.as_char().to_ascii_lowercase(),
        None => UNPLAYABLE,
    }
}

fn padding(duration_ms: u32) -> &'static str {
    if duration_ms >= LONG_NOTE_MS {
        "  "
    } else if duration_ms >= MEDIUM_NOTE_MS {
        " "
    } else {
        ""
    }
}

fn push_note(out: &mut String, note: &Note) {
    if note.is_rest() {
        return;
    }
    out.push(glyph(note.pitch));
    out.push_str(padding(note.duration_ms));
}

/// Render notes as one line of tablature, without a trailing newline.
pub fn render(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        push_note(&mut out, note);
    }
    out
}

/// Render notes with one tablature line per ABC body line.
///
/// Notes are matched to lines by counting the note and rest tokens of each
/// body line. Every body line produces a line of output ending in `\n`, even
/// when it holds no notes. If the counts disagree with `notes`, a
/// `RenderMismatch` warning is reported; notes left over after the last body
/// line are written on one extra line.
pub fn render_with_line_breaks(notes: &[Note], abc: &str, sink: &mut dyn FeedbackSink) -> String {
    let text = strip_ornaments(abc);
    let mut out = String::new();
    let mut remaining = notes.iter();
    let mut counted = 0usize;

    for raw in text.lines() {
        let Line::Body(line) = classify(raw) else {
            continue;
        };

        let count = scan_line(line)
            .iter()
            .filter(|t| t.token.produces_note())
            .count();
        counted += count;

        for note in remaining.by_ref().take(count) {
            push_note(&mut out, note);
        }
        out.push('\n');
    }

    let leftover: Vec<&Note> = remaining.collect();
    if !leftover.is_empty() {
        for note in leftover {
            push_note(&mut out, note);
        }
        out.push('\n');
    }

    if counted != notes.len() {
        sink.report(Feedback::warning(
            FeedbackKind::RenderMismatch {
                counted,
                notes: notes.len(),
            },
            format!(
                "ABC text has {} note tokens but {} notes were given",
                counted,
                notes.len()
            ),
        ));
    }

    out
}
