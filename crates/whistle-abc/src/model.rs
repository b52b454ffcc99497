//! Value types shared by the parser, the transposer and the renderer.

use serde::{Deserialize, Serialize};

/// Pitch value used for rests.
pub const REST: u8 = 0;

/// Lowest project pitch the pitch table maps (`C,`).
pub const PITCH_MIN: u8 = 28;

/// Highest project pitch the pitch table maps (`e''`).
pub const PITCH_MAX: u8 = 80;

/// Offset between MIDI note numbers and project pitches.
pub const MIDI_OFFSET: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Convert to semitone offset from C (0-11)
    pub fn to_semitone(&self) -> i8 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Position in C-D-E-F-G-A-B order, used to index per-letter tables.
    pub fn index(&self) -> usize {
        match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        }
    }

    /// Parse from a single letter (case-insensitive)
    pub fn from_char(c: char) -> Option<NoteName> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    Sharp,
    Natural,
    Flat,
}

impl Accidental {
    /// Convert to semitone offset
    pub fn to_semitone_offset(&self) -> i8 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Natural => 0,
            Accidental::Flat => -1,
        }
    }

    /// Parse from the ABC prefix character
    pub fn from_abc(c: char) -> Option<Accidental> {
        match c {
            '^' => Some(Accidental::Sharp),
            '=' => Some(Accidental::Natural),
            '_' => Some(Accidental::Flat),
            _ => None,
        }
    }

    pub fn as_abc(&self) -> char {
        match self {
            Accidental::Sharp => '^',
            Accidental::Natural => '=',
            Accidental::Flat => '_',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Major,
    Minor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// Parse mode from string (case-insensitive, first three letters are enough)
    pub fn parse(s: &str) -> Option<Mode> {
        let s = s.to_lowercase();
        if s.is_empty() {
            return Some(Mode::Major);
        }
        if s == "m" {
            return Some(Mode::Minor);
        }
        let prefix = s.get(..3)?;
        let mode = match prefix {
            "maj" => Mode::Major,
            "min" => Mode::Minor,
            "ion" => Mode::Ionian,
            "dor" => Mode::Dorian,
            "phr" => Mode::Phrygian,
            "lyd" => Mode::Lydian,
            "mix" => Mode::Mixolydian,
            "aeo" => Mode::Aeolian,
            "loc" => Mode::Locrian,
            _ => return None,
        };
        Some(mode)
    }
}

/// A playable event: a pitch (0 for a rest) held for a number of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub pitch: u8,
    pub duration_ms: u32,
}

impl Note {
    pub fn new(pitch: u8, duration_ms: u32) -> Self {
        Note { pitch, duration_ms }
    }

    pub fn rest(duration_ms: u32) -> Self {
        Note {
            pitch: REST,
            duration_ms,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch == REST
    }

    /// Shift a sounding note by `semitones`; rests stay rests.
    pub fn transpose(&mut self, semitones: i8) {
        if !self.is_rest() {
            self.pitch = (self.pitch as i16 + semitones as i16).clamp(1, u8::MAX as i16) as u8;
        }
    }

    /// Duration in seconds at a playback speed of `tempo_modifier` (1.0 = as written).
    pub fn seconds(&self, tempo_modifier: f32) -> f32 {
        self.duration_ms as f32 / 1000.0 / tempo_modifier
    }
}

/// Everything a caller gets back from one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub notes: Vec<Note>,
    pub title: String,
    pub key: String,
    pub meter: String,
    pub tempo_bpm: u16,
}

impl ParseResult {
    /// Iterator over the sounding (non-rest) notes.
    pub fn sounding(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.is_rest())
    }

    /// Lowest and highest sounding pitch, if any note sounds.
    pub fn pitch_span(&self) -> Option<(u8, u8)> {
        pitch_span(&self.notes)
    }
}

/// Lowest and highest non-rest pitch in `notes`.
pub fn pitch_span(notes: &[Note]) -> Option<(u8, u8)> {
    notes
        .iter()
        .filter(|n| !n.is_rest())
        .fold(None, |span, n| match span {
            None => Some((n.pitch, n.pitch)),
            Some((lo, hi)) => Some((lo.min(n.pitch), hi.max(n.pitch))),
        })
}

/// Seconds from the start of the melody to the end of its first `index`
/// sounding notes, counting the rests between them.
///
/// Rests after the last counted note are not included. Returns 0 when the
/// melody has fewer than `index` sounding notes.
pub fn elapsed_before(notes: &[Note], index: usize, tempo_modifier: f32) -> f32 {
    let mut time = 0.0;
    let mut sounding = 0;
    let mut remaining = notes.iter();

    while sounding < index {
        let Some(note) = remaining.next() else {
            return 0.0;
        };
        if !note.is_rest() {
            sounding += 1;
        }
        time += note.seconds(tempo_modifier);
    }

    time
}
