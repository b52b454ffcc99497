use thiserror::Error;

/// Fatal parse outcomes. Everything else is reported as feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("ABC notation is empty")]
    EmptyInput,

    #[error("No notes found in ABC notation")]
    NoNotes,
}

/// Errors reading the `pitch/durationMs,...` note file format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteFileError {
    #[error("note {index}: expected pitch/duration, found '{entry}'")]
    Malformed { index: usize, entry: String },

    #[error("note {index}: invalid number '{value}'")]
    InvalidNumber { index: usize, value: String },
}

/// Unknown whistle name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown whistle key '{0}'")]
pub struct WhistleKeyError(pub String);
