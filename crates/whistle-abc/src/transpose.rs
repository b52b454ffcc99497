//! Fitting a melody into the playable range of a D whistle.
//!
//! Shifts are searched in a fixed preference order, first avoiding any
//! half-holed pitch and then allowing them.

use crate::feedback::{Feedback, FeedbackKind, FeedbackSink};
use crate::model::{pitch_span, Note};
use crate::pitch::is_half_holed;

/// Lowest playable pitch (d on a D whistle).
pub const WHISTLE_MIN: u8 = 54;

/// Highest playable pitch (d'' on a D whistle).
pub const WHISTLE_MAX: u8 = 78;

/// Largest shift tried in either direction, in semitones.
pub const SHIFT_WINDOW: i8 = 24;

/// Which search pass produced a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPass {
    /// No half-holed pitch is visited
    Clean,
    /// Half-holed pitches were needed
    HalfHoled,
}

/// Outcome of [`auto_transpose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Shifted { shift: i8, pass: FitPass },
    /// Nothing to fit (empty, or only rests)
    Silent,
    OutOfRange { min: u8, max: u8 },
}

/// Shifts in preference order: 0, +12, -12, then by magnitude, positive first.
pub fn candidate_shifts() -> Vec<i8> {
    let mut shifts = vec![0, 12, -12];
    for magnitude in 1..=SHIFT_WINDOW {
        for shift in [magnitude, -magnitude] {
            if !shifts.contains(&shift) {
                shifts.push(shift);
            }
        }
    }
    shifts
}

fn fits_range(min: u8, max: u8, shift: i8) -> bool {
    let lo = min as i16 + shift as i16;
    let hi = max as i16 + shift as i16;
    lo >= WHISTLE_MIN as i16 && hi <= WHISTLE_MAX as i16
}

fn visits_half_holed(notes: &[Note], shift: i8) -> bool {
    notes
        .iter()
        .filter(|n| !n.is_rest())
        .any(|n| is_half_holed((n.pitch as i16 + shift as i16) as u8))
}

/// Find the preferred shift for `notes` without changing them.
pub fn find_shift(notes: &[Note]) -> Fit {
    let Some((min, max)) = pitch_span(notes) else {
        return Fit::Silent;
    };

    let fitting: Vec<i8> = candidate_shifts()
        .into_iter()
        .filter(|&s| fits_range(min, max, s))
        .collect();

    if let Some(&shift) = fitting.iter().find(|&&s| !visits_half_holed(notes, s)) {
        return Fit::Shifted {
            shift,
            pass: FitPass::Clean,
        };
    }

    match fitting.first() {
        Some(&shift) => Fit::Shifted {
            shift,
            pass: FitPass::HalfHoled,
        },
        None => Fit::OutOfRange { min, max },
    }
}

/// Add `shift` to every sounding note. Rests are left alone.
pub fn apply_shift(notes: &mut [Note], shift: i8) {
    if shift == 0 {
        return;
    }
    for note in notes.iter_mut() {
        note.transpose(shift);
    }
}

/// Shift `notes` into the whistle range, reporting what was done.
///
/// When no shift fits, the notes are left as they were and an
/// `OutOfRange` warning is reported.
pub fn auto_transpose(notes: &mut [Note], sink: &mut dyn FeedbackSink) -> Fit {
    let fit = find_shift(notes);

    match fit {
        Fit::Shifted { shift, pass } => {
            apply_shift(notes, shift);
            sink.report(Feedback::info(
                FeedbackKind::Transposed { shift },
                format!("Transposed by {:+} semitones", shift),
            ));
            if pass == FitPass::HalfHoled {
                sink.report(Feedback::warning(
                    FeedbackKind::HalfHoled { shift },
                    format!(
                        "No clean fit; transposing by {:+} needs half-holed notes",
                        shift
                    ),
                ));
            }
            tracing::debug!(shift, ?pass, "fitted melody to whistle range");
        }
        Fit::OutOfRange { min, max } => {
            sink.report(Feedback::warning(
                FeedbackKind::OutOfRange { min, max },
                format!(
                    "Melody spans {}..={}, which no shift within {} semitones fits into {}..={}",
                    min, max, SHIFT_WINDOW, WHISTLE_MIN, WHISTLE_MAX
                ),
            ));
        }
        Fit::Silent => {}
    }

    fit
}
