//! Note length parsing using winnow combinators.

use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::token::take_while;

/// The length suffix written after a note or rest, relative to the default length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthModifier {
    pub multiplier: u32,
    pub divisor: u32,
}

impl LengthModifier {
    pub fn new(multiplier: u32, divisor: u32) -> Self {
        LengthModifier {
            multiplier,
            divisor,
        }
    }

    pub fn unit() -> Self {
        LengthModifier::new(1, 1)
    }
}

impl Default for LengthModifier {
    fn default() -> Self {
        Self::unit()
    }
}

/// Parse a length suffix (2, /2, /, 3/2, or nothing)
pub fn parse_length(input: &mut &str) -> ModalResult<LengthModifier> {
    let multiplier_str: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let multiplier = if multiplier_str.is_empty() {
        1
    } else {
        multiplier_str.parse().unwrap_or(1)
    };

    let divisor = match opt(parse_divisor).parse_next(input)? {
        Some(Some(d)) if d > 0 => d,
        Some(Some(_)) => 1,
        Some(None) => 2, // A/ means A/2
        None => 1,
    };

    Ok(LengthModifier::new(multiplier, divisor))
}

/// Parse the divisor part of a length (/2, /, /4)
fn parse_divisor(input: &mut &str) -> ModalResult<Option<u32>> {
    '/'.parse_next(input)?;
    let den_str: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if den_str.is_empty() {
        Ok(None)
    } else {
        Ok(den_str.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        let mut input = "2";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::new(2, 1));

        let mut input = "/2";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::new(1, 2));

        let mut input = "/";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::new(1, 2));

        let mut input = "3/2";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::new(3, 2));

        let mut input = "";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::unit());
    }

    #[test]
    fn test_parse_length_stops_at_next_note() {
        let mut input = "4B";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::new(4, 1));
        assert_eq!(input, "B");
    }

    #[test]
    fn test_parse_length_zero_divisor() {
        let mut input = "/0";
        assert_eq!(parse_length(&mut input).unwrap(), LengthModifier::unit());
    }
}
