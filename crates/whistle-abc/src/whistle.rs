//! Whistle sizes and retuning between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WhistleKeyError;
use crate::key::Key;
use crate::model::{Accidental, NoteName, Note};

/// A whistle size, named the way players name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WhistleKey {
    HighG,
    HighF,
    HighE,
    HighEb,
    #[default]
    HighD,
    HighDb,
    HighC,
    B,
    Bb,
    LowA,
    LowGSharp,
    LowG,
    LowFSharp,
    LowF,
    LowE,
    LowEb,
    LowD,
    LowC,
}

impl WhistleKey {
    /// All whistles, highest first.
    pub fn all() -> [WhistleKey; 18] {
        use WhistleKey::*;
        [
            HighG, HighF, HighE, HighEb, HighD, HighDb, HighC, B, Bb, LowA, LowGSharp, LowG,
            LowFSharp, LowF, LowE, LowEb, LowD, LowC,
        ]
    }

    /// Semitones from a High D whistle.
    pub fn offset(&self) -> i8 {
        use WhistleKey::*;
        match self {
            HighG => 5,
            HighF => 3,
            HighE => 2,
            HighEb => 1,
            HighD => 0,
            HighDb => -1,
            HighC => -2,
            B => -3,
            Bb => -4,
            LowA => -5,
            LowGSharp => -6,
            LowG => -7,
            LowFSharp => -8,
            LowF => -9,
            LowE => -10,
            LowEb => -11,
            LowD => -12,
            LowC => -14,
        }
    }

    pub fn label(&self) -> &'static str {
        use WhistleKey::*;
        match self {
            HighG => "High G",
            HighF => "High F",
            HighE => "High E",
            HighEb => "High Eb",
            HighD => "High D",
            HighDb => "High Db",
            HighC => "High C",
            B => "B",
            Bb => "Bb",
            LowA => "Low A",
            LowGSharp => "Low G#",
            LowG => "Low G",
            LowFSharp => "Low F#",
            LowF => "Low F",
            LowE => "Low E",
            LowEb => "Low Eb",
            LowD => "Low D",
            LowC => "Low C",
        }
    }

    /// The whistle that plays a tune in `abc_key` without cross-fingering.
    ///
    /// Only the tonic matters; unusual tonics fall back to High D.
    pub fn suggest_for(abc_key: &str) -> WhistleKey {
        let Some(key) = Key::parse(abc_key) else {
            return WhistleKey::HighD;
        };

        use NoteName::*;
        match (key.root, key.accidental) {
            (G, None) => WhistleKey::HighG,
            (F, None) => WhistleKey::HighF,
            (E, None) => WhistleKey::HighE,
            (E, Some(Accidental::Flat)) => WhistleKey::HighEb,
            (D, Some(Accidental::Flat)) => WhistleKey::HighDb,
            (C, None) => WhistleKey::HighC,
            (B, None) => WhistleKey::B,
            (B, Some(Accidental::Flat)) => WhistleKey::Bb,
            (A, None) => WhistleKey::LowA,
            _ => WhistleKey::HighD,
        }
    }
}

impl fmt::Display for WhistleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WhistleKey {
    type Err = WhistleKeyError;

    /// Accepts labels case-insensitively, with or without spaces
    /// ("Low A", "low-a", "lowa").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        WhistleKey::all()
            .into_iter()
            .find(|k| normalize(k.label()) == wanted)
            .ok_or_else(|| WhistleKeyError(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Shift notes written for the `from` whistle so they finger the same on `to`.
pub fn retune(notes: &mut [Note], from: WhistleKey, to: WhistleKey) {
    let shift = to.offset() - from.offset();
    if shift != 0 {
        for note in notes.iter_mut() {
            note.transpose(shift);
        }
    }
}
