//! Note lengths and the tempo model that turns them into milliseconds.

use serde::{Deserialize, Serialize};

/// A note length measured in eighth notes, kept as a fraction so that
/// `L:1/16` and `A/4` do not truncate to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Length {
    pub numerator: u32,
    pub denominator: u32,
}

impl Length {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Length {
            numerator,
            denominator: denominator.max(1),
        }
        .reduced()
    }

    /// One eighth note, the default when no `L:` field is present.
    pub fn eighth() -> Self {
        Length::new(1, 1)
    }

    /// Length of the fraction `p/q` of a whole note (an `L:` value).
    pub fn from_fraction(p: u32, q: u32) -> Self {
        Length::new(p.saturating_mul(8), q)
    }

    /// Multiply by `n` then divide by `d`.
    pub fn scale(&self, n: u32, d: u32) -> Self {
        Length::new(
            self.numerator.saturating_mul(n),
            self.denominator.saturating_mul(d.max(1)),
        )
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn reduced(self) -> Self {
        let g = gcd(self.numerator, self.denominator);
        if g > 1 {
            Length {
                numerator: self.numerator / g,
                denominator: self.denominator / g,
            }
        } else {
            self
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::eighth()
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Tempo (Q: field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    pub bpm: u16,
    pub beat_num: u16,
    pub beat_den: u16,
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo {
            bpm: 120,
            beat_num: 1,
            beat_den: 4,
        }
    }
}

impl Tempo {
    pub const MAX_BPM: u16 = 400;

    /// Build a tempo, rejecting values outside the supported ranges.
    pub fn new(bpm: u16, beat_num: u16, beat_den: u16) -> Option<Tempo> {
        let valid = (1..=Self::MAX_BPM).contains(&bpm)
            && beat_num >= 1
            && matches!(beat_den, 1 | 2 | 4 | 8 | 16);
        valid.then_some(Tempo {
            bpm,
            beat_num,
            beat_den,
        })
    }

    /// Parse a Q: field value (e.g., "1/4=120", "120", "\"Allegro\" 3/8=110")
    pub fn parse(value: &str) -> Option<Tempo> {
        let trimmed = value.trim();

        // Drop a leading quoted tempo text
        let rest = match trimmed.strip_prefix('"') {
            Some(after) => match after.find('"') {
                Some(end) => after[end + 1..].trim(),
                None => trimmed,
            },
            None => trimmed,
        };

        if let Some((beat_part, bpm_part)) = rest.split_once('=') {
            // the beat unit is the last word before '=' ("Allegro 1/4=120")
            let beat_part = beat_part.split_whitespace().last()?;
            let (num, den) = parse_fraction(beat_part)?;
            let bpm = leading_number(bpm_part.trim())?;
            Tempo::new(bpm, num, den)
        } else {
            let bpm = leading_number(rest)?;
            Tempo::new(bpm, 1, 4)
        }
    }

    /// Milliseconds for a note of `length` eighth notes.
    pub fn duration_ms(&self, length: Length) -> u32 {
        let beat_ms = 60_000.0 / self.bpm as f64;
        let beat_units = self.beat_num as f64 * (8.0 / self.beat_den as f64);
        let unit_ms = beat_ms / beat_units;
        let ms = (unit_ms * length.as_f64()).round();
        (ms as u32).max(1)
    }
}

/// Parse a fraction like "1/4" or "3/8"
pub fn parse_fraction(s: &str) -> Option<(u16, u16)> {
    let (num, den) = s.split_once('/')?;
    let num = num.trim().parse().ok()?;
    let den = den.trim().parse().ok()?;
    Some((num, den))
}

/// Parse an L: field value (e.g., "1/8", "1/16") into a default length.
pub fn parse_unit_length(value: &str) -> Option<Length> {
    let (p, q) = parse_fraction(value.trim())?;
    if p == 0 || q == 0 {
        return None;
    }
    Some(Length::from_fraction(p as u32, q as u32))
}

fn leading_number(s: &str) -> Option<u16> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
