//! Key signatures: from a `K:` name to per-letter accidentals.

use serde::{Deserialize, Serialize};

use crate::model::{Accidental, Mode, NoteName};

/// Letters that receive sharps, in circle-of-fifths order.
const SHARP_ORDER: [NoteName; 7] = [
    NoteName::F,
    NoteName::C,
    NoteName::G,
    NoteName::D,
    NoteName::A,
    NoteName::E,
    NoteName::B,
];

/// Letters that receive flats, in circle-of-fifths order.
const FLAT_ORDER: [NoteName; 7] = [
    NoteName::B,
    NoteName::E,
    NoteName::A,
    NoteName::D,
    NoteName::G,
    NoteName::C,
    NoteName::F,
];

/// A parsed key name (e.g. "G", "Am", "Bbmin", "D dorian").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub root: NoteName,
    pub accidental: Option<Accidental>,
    pub mode: Mode,
}

impl Default for Key {
    fn default() -> Self {
        Key {
            root: NoteName::C,
            accidental: None,
            mode: Mode::Major,
        }
    }
}

impl Key {
    /// Parse a key name. Returns `None` for anything that is not a key.
    pub fn parse(value: &str) -> Option<Key> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();

        let root = NoteName::from_char(chars.next()?)?;
        let rest = chars.as_str();

        // '#'/'b' after the root is an accidental, unless 'b' starts a word
        // that is not itself a mode ("Bb", "BB" and "Bbm" are flat, "bm" is not)
        let (accidental, rest) = match rest.chars().next() {
            Some('#') | Some('♯') => (Some(Accidental::Sharp), skip_first(rest)),
            Some('♭') => (Some(Accidental::Flat), skip_first(rest)),
            Some('b' | 'B') if parse_mode(skip_first(rest)).is_some() => {
                (Some(Accidental::Flat), skip_first(rest))
            }
            _ => (None, rest),
        };

        let mode = parse_mode(rest)?;

        Some(Key {
            root,
            accidental,
            mode,
        })
    }

    /// Position on the circle of fifths: sharps positive, flats negative.
    ///
    /// Minor keys resolve to their relative major. Other modes use the major
    /// of the same tonic. Returns `None` past seven sharps or flats.
    pub fn fifths(&self) -> Option<i8> {
        let base = match self.root {
            NoteName::F => -1,
            NoteName::C => 0,
            NoteName::G => 1,
            NoteName::D => 2,
            NoteName::A => 3,
            NoteName::E => 4,
            NoteName::B => 5,
        };
        let acc = match self.accidental {
            Some(Accidental::Sharp) => 7,
            Some(Accidental::Flat) => -7,
            _ => 0,
        };
        let mode = match self.mode {
            Mode::Minor | Mode::Aeolian => -3,
            _ => 0,
        };

        let total = base + acc + mode;
        (-7..=7).contains(&total).then_some(total)
    }

    pub fn accidentals(&self) -> KeyAccidentals {
        self.fifths()
            .map(KeyAccidentals::from_fifths)
            .unwrap_or_default()
    }
}

fn skip_first(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}

/// First word that is not a `name=value` pair, parsed as a mode.
fn parse_mode(rest: &str) -> Option<Mode> {
    let word = rest
        .split_whitespace()
        .find(|w| !w.contains('='))
        .unwrap_or("");
    Mode::parse(word)
}

/// Per-letter accidental offsets implied by a key: +1 sharp, -1 flat, 0 natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyAccidentals([i8; 7]);

impl KeyAccidentals {
    pub fn from_fifths(fifths: i8) -> Self {
        let mut table = [0i8; 7];
        let (order, offset) = if fifths >= 0 {
            (&SHARP_ORDER, 1)
        } else {
            (&FLAT_ORDER, -1)
        };
        for name in order.iter().take(fifths.unsigned_abs() as usize) {
            table[name.index()] = offset;
        }
        KeyAccidentals(table)
    }

    pub fn get(&self, name: NoteName) -> i8 {
        self.0[name.index()]
    }

    /// The accidental the key applies to `name`, if any.
    pub fn accidental(&self, name: NoteName) -> Option<Accidental> {
        match self.get(name) {
            1 => Some(Accidental::Sharp),
            -1 => Some(Accidental::Flat),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&a| a == 0)
    }

    /// Number of altered letters.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|&&a| a != 0).count()
    }
}

/// Resolve a key name to its accidentals. Unknown keys give C major.
pub fn accidentals_for(key_name: &str) -> KeyAccidentals {
    Key::parse(key_name)
        .map(|key| key.accidentals())
        .unwrap_or_default()
}
