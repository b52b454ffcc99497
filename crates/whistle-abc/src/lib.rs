//! ABC notation to tin whistle notes and tablature.
//!
//! This crate parses monophonic ABC tunes into timed notes, applies the key
//! signature, shifts the melody into the range of a D whistle and renders
//! whistle tablature that follows the line layout of the ABC text.
//!
//! # Example
//!
//! ```
//! use whistle_abc::{parse_and_fit, tab};
//!
//! let abc = r#"
//! X:1
//! T:Test
//! M:4/4
//! L:1/8
//! Q:1/4=120
//! K:D
//! |:DEFG ABcd:|
//! "#;
//!
//! let result = parse_and_fit(abc).unwrap();
//! assert_eq!(result.notes.len(), 8);
//! assert_eq!(result.key, "D");
//!
//! let mut sink = whistle_abc::NoopSink;
//! let tablature = tab::render_with_line_breaks(&result.notes, abc, &mut sink);
//! assert_eq!(tablature, "defgabcD\n");
//! ```

pub mod error;
pub mod feedback;
pub mod key;
pub mod model;
pub mod notefile;
pub mod parser;
pub mod pitch;
pub mod tab;
pub mod tempo;
pub mod transpose;
pub mod whistle;

pub use error::{NoteFileError, ParseError, WhistleKeyError};
pub use feedback::{
    Feedback, FeedbackCollector, FeedbackKind, FeedbackLevel, FeedbackSink, NoopSink, TracingSink,
};
pub use key::{accidentals_for, Key, KeyAccidentals};
pub use model::{elapsed_before, Note, ParseResult};
pub use notefile::{from_note_file, to_note_file};
pub use pitch::lookup;
pub use tab::{render, render_with_line_breaks};
pub use tempo::{Length, Tempo};
pub use transpose::{auto_transpose, Fit};
pub use whistle::{retune, WhistleKey};

/// Parse ABC notation without transposing.
pub fn parse(abc: &str) -> Result<ParseResult, ParseError> {
    parse_with(abc, &mut NoopSink)
}

/// Parse ABC notation, reporting feedback to `sink`.
pub fn parse_with(abc: &str, sink: &mut dyn FeedbackSink) -> Result<ParseResult, ParseError> {
    parser::parse(abc, sink)
}

/// Parse ABC notation and fit the melody to the whistle range.
pub fn parse_and_fit(abc: &str) -> Result<ParseResult, ParseError> {
    parse_and_fit_with(abc, &mut NoopSink)
}

/// [`parse_and_fit`] with feedback reported to `sink`.
pub fn parse_and_fit_with(
    abc: &str,
    sink: &mut dyn FeedbackSink,
) -> Result<ParseResult, ParseError> {
    let mut result = parser::parse(abc, sink)?;
    transpose::auto_transpose(&mut result.notes, sink);
    Ok(result)
}
