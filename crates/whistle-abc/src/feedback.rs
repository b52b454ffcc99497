//! Parser feedback (warnings, skipped tokens, transposition notes).
//!
//! Nothing here is fatal. The parser, transposer and renderer report what
//! they noticed to a [`FeedbackSink`] and carry on; the caller decides
//! whether to collect, log or drop it.

use serde::{Deserialize, Serialize};

/// One piece of feedback, tied to a position in the ABC text when it has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub kind: FeedbackKind,
    pub message: String,
    /// 1-based line in the input, 0 when not tied to the text
    pub line: usize,
    /// 1-based column in the (trimmed) line, 0 when not tied to the text
    pub column: usize,
}

impl Feedback {
    pub fn new(level: FeedbackLevel, kind: FeedbackKind, message: impl Into<String>) -> Self {
        Feedback {
            level,
            kind,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn warning(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Warning, kind, message)
    }

    pub fn info(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Info, kind, message)
    }

    pub fn debug(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Debug, kind, message)
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedbackLevel {
    /// Something the user should look at; the result may not be what they meant
    Warning,
    /// Noteworthy decision, e.g. the chosen transposition
    Info,
    /// Low-level detail such as an ignored token
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    /// A note token in the body could not be mapped to a pitch
    TokenSkipped { token: String },
    /// No shift in the search window fits the melody on the whistle
    OutOfRange { min: u8, max: u8 },
    /// The chosen shift needs half-holed fingerings
    HalfHoled { shift: i8 },
    /// The melody was shifted by this many semitones
    Transposed { shift: i8 },
    /// A header value could not be understood and was ignored
    InvalidHeader { field: char, value: String },
    /// Renderer token count disagrees with the note list
    RenderMismatch { counted: usize, notes: usize },
}

/// Receiver for feedback. Implementations must not fail.
pub trait FeedbackSink {
    fn report(&mut self, feedback: Feedback);
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for &mut S {
    fn report(&mut self, feedback: Feedback) {
        (**self).report(feedback)
    }
}

/// Sink that drops everything. The default for the pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl FeedbackSink for NoopSink {
    fn report(&mut self, _feedback: Feedback) {}
}

/// Collector for feedback during parsing
#[derive(Debug, Default)]
pub struct FeedbackCollector {
    feedback: Vec<Feedback>,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        FeedbackCollector {
            feedback: Vec::new(),
        }
    }

    /// Check if any warnings were recorded
    pub fn has_warnings(&self) -> bool {
        self.feedback
            .iter()
            .any(|f| f.level == FeedbackLevel::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Warning)
    }

    /// Feedback whose kind matches `pred`
    pub fn of_kind<'a>(
        &'a self,
        pred: impl Fn(&FeedbackKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Feedback> + 'a {
        self.feedback.iter().filter(move |f| pred(&f.kind))
    }

    /// Get all feedback
    pub fn into_feedback(self) -> Vec<Feedback> {
        self.feedback
    }

    /// Get feedback by reference
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }
}

impl FeedbackSink for FeedbackCollector {
    fn report(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }
}

/// Sink that turns feedback into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FeedbackSink for TracingSink {
    fn report(&mut self, feedback: Feedback) {
        let Feedback {
            level,
            kind,
            message,
            line,
            column,
        } = feedback;
        match level {
            FeedbackLevel::Warning => {
                tracing::warn!(line, column, ?kind, "{}", message)
            }
            FeedbackLevel::Info => tracing::info!(line, column, ?kind, "{}", message),
            FeedbackLevel::Debug => tracing::debug!(line, column, ?kind, "{}", message),
        }
    }
}
