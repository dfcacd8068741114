#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Flags override the `CONTRAST_*` environment read by [`crate::config`].

use std::fmt;
use std::process;

use contrast_core::Thresholds;

use crate::config::{Config, OutputFormat, parse_fraction, parse_positive_f64, parse_usize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
contrast: WCAG 2.x and APCA contrast checker with palette suggestions

USAGE:
    contrast --fg=COLOR --bg=COLOR [OPTIONS]

COLORS:
    Hex (#rgb, #rgba, #rrggbb, #rrggbbaa), rgb()/rgba(), hsl()/hsla(),
    or a CSS color name. Alpha is ignored.

OPTIONS:
    --fg=COLOR         Text (foreground) color
    --bg=COLOR         Surface (background) color
    --focus=COLOR      Focus indicator color, checked against the background
                       and against the foreground at 3:1
    --wcag=N           WCAG ratio threshold, e.g. 3, 4.5, 7 (default: 4.5)
    --apca=N           APCA |Lc| threshold, e.g. 45, 60, 75, 90 (default: 60)
    --count=N          Suggestions per color (default: 5)
    --spacing=N        Minimum lightness gap between suggestions, 0-1 (default: 0.1)
    --no-apca          Check WCAG only; APCA is reported as unverified
    --json             Print the report as JSON
    --format=FORMAT    Output format: 'text' (default) or 'json'
    --help, -h         Show this help message
    --version, -V      Show version

EXIT STATUS:
    0  every check passed
    1  at least one check failed
    2  invalid arguments or unparseable color

ENVIRONMENT VARIABLES:
    CONTRAST_WCAG_THRESHOLD   Default for --wcag
    CONTRAST_APCA_THRESHOLD   Default for --apca
    CONTRAST_SUGGESTIONS      Default for --count
    CONTRAST_MIN_SPACING      Default for --spacing
    CONTRAST_APCA             0/false/off behaves like --no-apca
    CONTRAST_FORMAT           Default for --format
    CONTRAST_LOG              Log filter for stderr diagnostics (default: warn)
    CONTRAST_LOG_FORMAT       'json' for JSON log lines";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub foreground: String,
    pub background: String,
    pub focus: Option<String>,
    pub thresholds: Thresholds,
    pub count: usize,
    pub min_spacing: f64,
    pub apca: bool,
    pub format: OutputFormat,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Run(Opts),
    Help,
    Version,
}

/// A command line that cannot be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    Unknown(String),
    InvalidValue { flag: &'static str, value: String },
    Missing(&'static str),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(arg) => write!(f, "Unknown argument: {arg}"),
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::Missing(flag) => write!(f, "Missing required {flag}=COLOR"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse `std::env::args` on top of `config`, printing help or version
    /// and exiting when asked to.
    pub fn parse(config: &Config) -> Self {
        match Self::parse_from(std::env::args().skip(1), config) {
            Ok(Action::Run(opts)) => opts,
            Ok(Action::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Action::Version) => {
                println!("contrast {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(2);
            }
        }
    }

    /// Parse arguments (without the program name) on top of `config`.
    pub fn parse_from<I, S>(args: I, config: &Config) -> Result<Action, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut foreground = None;
        let mut background = None;
        let mut focus = None;
        let mut thresholds = config.thresholds;
        let mut count = config.suggestions;
        let mut min_spacing = config.min_spacing;
        let mut apca = config.apca;
        let mut format = config.format;

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Action::Help),
                "--version" | "-V" => return Ok(Action::Version),
                "--no-apca" => apca = false,
                "--json" => format = OutputFormat::Json,
                other => {
                    if let Some(val) = other.strip_prefix("--fg=") {
                        foreground = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--bg=") {
                        background = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--focus=") {
                        focus = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--wcag=") {
                        thresholds.wcag = parse_positive_f64(val).ok_or_else(|| invalid("--wcag", val))?;
                    } else if let Some(val) = other.strip_prefix("--apca=") {
                        thresholds.apca = parse_positive_f64(val).ok_or_else(|| invalid("--apca", val))?;
                    } else if let Some(val) = other.strip_prefix("--count=") {
                        count = parse_usize(val)
                            .filter(|n| *n > 0)
                            .ok_or_else(|| invalid("--count", val))?;
                    } else if let Some(val) = other.strip_prefix("--spacing=") {
                        min_spacing = parse_fraction(val).ok_or_else(|| invalid("--spacing", val))?;
                    } else if let Some(val) = other.strip_prefix("--format=") {
                        format = OutputFormat::parse(val).ok_or_else(|| invalid("--format", val))?;
                    } else {
                        return Err(CliError::Unknown(other.to_string()));
                    }
                }
            }
        }

        Ok(Action::Run(Opts {
            foreground: foreground.ok_or(CliError::Missing("--fg"))?,
            background: background.ok_or(CliError::Missing("--bg"))?,
            focus,
            thresholds,
            count,
            min_spacing,
            apca,
            format,
        }))
    }
}

fn invalid(flag: &'static str, value: &str) -> CliError {
    CliError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}
