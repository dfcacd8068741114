#![forbid(unsafe_code)]

//! CSS color string parsing.
//!
//! The evaluator does not parse colors itself; it asks a [`ColorParser`].
//! [`CssColorParser`] hands the string to `csscolorparser`, which covers CSS
//! Color Level 4 hex, `rgb()`, `hsl()`, `hwb()` and the named colors. Alpha
//! is accepted and dropped.

use std::str::FromStr;

use csscolorparser::ParseColorError;

use crate::color::Rgb;
use crate::error::{ColorParseError, ParseReason};

/// Resolves a color string to RGB.
pub trait ColorParser: Send + Sync {
    /// Parse `input` or report why it is not a color.
    fn parse(&self, input: &str) -> Result<Rgb, ColorParseError>;
}

impl<F> ColorParser for F
where
    F: Fn(&str) -> Result<Rgb, ColorParseError> + Send + Sync,
{
    fn parse(&self, input: &str) -> Result<Rgb, ColorParseError> {
        self(input)
    }
}

/// Parser for CSS color syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssColorParser;

impl ColorParser for CssColorParser {
    fn parse(&self, input: &str) -> Result<Rgb, ColorParseError> {
        parse_css_color(input)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s)
    }
}

/// Parse a CSS color string.
pub fn parse_css_color(input: &str) -> Result<Rgb, ColorParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorParseError::new(input, ParseReason::Empty));
    }
    // csscolorparser slices on byte offsets; keep non-ASCII away from it.
    if !trimmed.is_ascii() {
        return Err(ColorParseError::new(input, ParseReason::UnknownName));
    }

    match csscolorparser::parse(trimmed) {
        Ok(color) => {
            let [r, g, b, _alpha] = color.to_rgba8();
            Ok(Rgb::new(r, g, b))
        }
        Err(err) => Err(ColorParseError::new(input, reason_for(trimmed, &err))),
    }
}

fn reason_for(input: &str, err: &ParseColorError) -> ParseReason {
    match err {
        ParseColorError::InvalidHex => ParseReason::InvalidHex,
        // An unclosed `rgb(` falls through to the unknown case.
        ParseColorError::InvalidUnknown if input.contains('(') => ParseReason::InvalidFunction,
        ParseColorError::InvalidUnknown => ParseReason::UnknownName,
        _ => ParseReason::InvalidFunction,
    }
}
