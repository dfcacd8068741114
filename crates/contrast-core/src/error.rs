#![forbid(unsafe_code)]

//! Error types for parsing and evaluation.

use std::fmt;

use serde::Serialize;

/// Why a color string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseReason {
    /// Input was empty or whitespace.
    Empty,
    /// `#` followed by the wrong number of digits or non-hex characters.
    InvalidHex,
    /// Unknown color function or malformed arguments.
    InvalidFunction,
    /// Not a known color keyword.
    UnknownName,
}

impl ParseReason {
    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Empty => "empty color string",
            Self::InvalidHex => "invalid hex color",
            Self::InvalidFunction => "invalid color function",
            Self::UnknownName => "unknown color name",
        }
    }
}

/// A color string that could not be resolved to RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    /// The offending input, as given.
    pub input: String,
    /// Why it was rejected.
    pub reason: ParseReason,
}

impl ColorParseError {
    /// Create a parse error for `input`.
    pub fn new(input: impl Into<String>, reason: ParseReason) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not parse color: \"{}\" ({})",
            self.input,
            self.reason.description()
        )
    }
}

impl std::error::Error for ColorParseError {}

/// Which input a color belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    /// Text / foreground color.
    Foreground,
    /// Surface / background color.
    Background,
    /// Focus indicator (third color).
    Focus,
}

impl ColorRole {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single evaluation request. No partial report is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluateError {
    /// One of the input colors could not be parsed.
    Parse {
        /// Which input failed.
        role: ColorRole,
        /// Parser diagnostics, including the offending string.
        source: ColorParseError,
    },
    /// A threshold was not a positive finite number.
    InvalidThreshold {
        /// `"wcag"` or `"apca"`.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { role, source } => write!(f, "{role} color: {source}"),
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} threshold must be a positive number, got {value}")
            }
        }
    }
}

impl std::error::Error for EvaluateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::InvalidThreshold { .. } => None,
        }
    }
}
