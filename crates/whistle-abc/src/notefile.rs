//! The saved-song note format: `pitch/durationMs` pairs joined by commas.
//!
//! ```text
//! 42/500,44/500,0/250,47/1000
//! ```

use crate::error::NoteFileError;
use crate::model::Note;

/// Write notes in note-file form, on one line without a trailing newline.
pub fn to_note_file(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| format!("{}/{}", n.pitch, n.duration_ms))
        .collect::<Vec<_>>()
        .join(",")
}

/// Read a note file. Surrounding whitespace is ignored and empty text is an
/// empty melody.
pub fn from_note_file(text: &str) -> Result<Vec<Note>, NoteFileError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(',')
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry.trim()))
        .collect()
}

fn parse_entry(index: usize, entry: &str) -> Result<Note, NoteFileError> {
    let (pitch, duration) = entry
        .split_once('/')
        .ok_or_else(|| NoteFileError::Malformed {
            index,
            entry: entry.to_string(),
        })?;

    let pitch = pitch
        .trim()
        .parse::<u8>()
        .map_err(|_| NoteFileError::InvalidNumber {
            index,
            value: pitch.to_string(),
        })?;
    let duration_ms = duration
        .trim()
        .parse::<u32>()
        .map_err(|_| NoteFileError::InvalidNumber {
            index,
            value: duration.to_string(),
        })?;

    Ok(Note::new(pitch, duration_ms))
}
