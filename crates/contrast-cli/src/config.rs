#![forbid(unsafe_code)]

//! Environment configuration for the `contrast` binary.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `CONTRAST_WCAG_THRESHOLD` | WCAG ratio threshold | `4.5` |
//! | `CONTRAST_APCA_THRESHOLD` | APCA \|Lc\| threshold | `60` |
//! | `CONTRAST_SUGGESTIONS` | suggestions per role | `5` |
//! | `CONTRAST_MIN_SPACING` | lightness spacing of suggestions | `0.10` |
//! | `CONTRAST_APCA` | bool; off runs WCAG-only | `on` |
//! | `CONTRAST_FORMAT` | `text` or `json` | `text` |
//! | `CONTRAST_LOG` | tracing filter directives | `warn` |
//! | `CONTRAST_LOG_FORMAT` | `text` or `json` log lines | `text` |
//!
//! Invalid values are collected as [`ConfigError`]s and the default is kept.

use std::env;
use std::fmt;

use contrast_core::search::{DEFAULT_COUNT, DEFAULT_MIN_SPACING};
use contrast_core::{SearchConfig, Thresholds};
use serde::Serialize;

pub const ENV_WCAG_THRESHOLD: &str = "CONTRAST_WCAG_THRESHOLD";
pub const ENV_APCA_THRESHOLD: &str = "CONTRAST_APCA_THRESHOLD";
pub const ENV_SUGGESTIONS: &str = "CONTRAST_SUGGESTIONS";
pub const ENV_MIN_SPACING: &str = "CONTRAST_MIN_SPACING";
pub const ENV_APCA: &str = "CONTRAST_APCA";
pub const ENV_FORMAT: &str = "CONTRAST_FORMAT";
pub const ENV_LOG: &str = "CONTRAST_LOG";
pub const ENV_LOG_FORMAT: &str = "CONTRAST_LOG_FORMAT";

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by the environment and the command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub thresholds: Thresholds,
    pub suggestions: usize,
    pub min_spacing: f64,
    /// `false` runs with APCA unavailable.
    pub apca: bool,
    pub format: OutputFormat,
    /// `EnvFilter` directives for diagnostics on stderr.
    pub log_filter: String,
    pub log_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            suggestions: DEFAULT_COUNT,
            min_spacing: DEFAULT_MIN_SPACING,
            apca: true,
            format: OutputFormat::Text,
            log_filter: "warn".to_string(),
            log_format: OutputFormat::Text,
        }
    }
}

/// Configuration parse diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: Config,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Search configuration for the core evaluator.
    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        search_config(self.suggestions, self.min_spacing)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if let Err((name, value)) = self.thresholds.validate() {
            errors.push(ConfigError::new(name, value.to_string(), "expected positive number"));
        }
        if let Err((name, value)) = self.search_config().validate() {
            errors.push(ConfigError::new(name, value.to_string(), "out of range"));
        }
        if self.suggestions == 0 {
            errors.push(ConfigError::new("suggestions", "0", "expected positive integer"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Search configuration for a suggestion count and spacing.
#[must_use]
pub fn search_config(count: usize, min_spacing: f64) -> SearchConfig {
    SearchConfig {
        min_spacing,
        ..SearchConfig::default()
    }
    .with_count(count)
}

pub(crate) fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = Config::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_WCAG_THRESHOLD) {
        match parse_positive_f64(&value) {
            Some(parsed) => config.thresholds.wcag = parsed,
            None => errors.push(ConfigError::new("wcag_threshold", value, "expected positive number")),
        }
    }

    if let Some(value) = get(ENV_APCA_THRESHOLD) {
        match parse_positive_f64(&value) {
            Some(parsed) => config.thresholds.apca = parsed,
            None => errors.push(ConfigError::new("apca_threshold", value, "expected positive number")),
        }
    }

    if let Some(value) = get(ENV_SUGGESTIONS) {
        match parse_usize(&value).filter(|n| *n > 0) {
            Some(parsed) => config.suggestions = parsed,
            None => errors.push(ConfigError::new("suggestions", value, "expected positive integer")),
        }
    }

    if let Some(value) = get(ENV_MIN_SPACING) {
        match parse_fraction(&value) {
            Some(parsed) => config.min_spacing = parsed,
            None => errors.push(ConfigError::new("min_spacing", value, "expected number in [0, 1]")),
        }
    }

    if let Some(value) = get(ENV_APCA) {
        match parse_bool(&value) {
            Some(parsed) => config.apca = parsed,
            None => errors.push(ConfigError::new("apca", value, "expected bool (1/0/true/false)")),
        }
    }

    if let Some(value) = get(ENV_FORMAT) {
        match OutputFormat::parse(&value) {
            Some(parsed) => config.format = parsed,
            None => errors.push(ConfigError::new("format", value, "expected text|json")),
        }
    }

    if let Some(value) = get(ENV_LOG) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::new("log", value, "expected filter directives"));
        } else {
            config.log_filter = trimmed.to_string();
        }
    }

    if let Some(value) = get(ENV_LOG_FORMAT) {
        match OutputFormat::parse(&value) {
            Some(parsed) => config.log_format = parsed,
            None => errors.push(ConfigError::new("log_format", value, "expected text|json")),
        }
    }

    ConfigParse { config, errors }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
pub(crate) fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

pub(crate) fn parse_positive_f64(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

pub(crate) fn parse_fraction(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> ConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_env_gives_defaults() {
        let parsed = parse(&[]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config, Config::default());
        assert!(parsed.config.validate().is_ok());
    }

    #[test]
    fn all_variables_are_read() {
        let parsed = parse(&[
            (ENV_WCAG_THRESHOLD, "7"),
            (ENV_APCA_THRESHOLD, " 75 "),
            (ENV_SUGGESTIONS, "3"),
            (ENV_MIN_SPACING, "0.2"),
            (ENV_APCA, "off"),
            (ENV_FORMAT, "JSON"),
            (ENV_LOG, "contrast_core=debug"),
            (ENV_LOG_FORMAT, "json"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.thresholds, Thresholds::new(7.0, 75.0));
        assert_eq!(config.suggestions, 3);
        assert_eq!(config.min_spacing, 0.2);
        assert!(!config.apca);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_filter, "contrast_core=debug");
        assert_eq!(config.log_format, OutputFormat::Json);
        assert_eq!(config.search_config().count, 3);
    }

    #[test]
    fn invalid_values_keep_defaults_and_report() {
        let parsed = parse(&[
            (ENV_WCAG_THRESHOLD, "-1"),
            (ENV_APCA_THRESHOLD, "NaN"),
            (ENV_SUGGESTIONS, "0"),
            (ENV_MIN_SPACING, "2"),
            (ENV_APCA, "maybe"),
            (ENV_FORMAT, "xml"),
        ]);
        assert_eq!(parsed.config, Config::default());
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["wcag_threshold", "apca_threshold", "suggestions", "min_spacing", "apca", "format"]
        );
        assert_eq!(parsed.errors[4].to_string(), "apca=maybe (expected bool (1/0/true/false))");
    }

    #[test]
    fn validate_catches_programmatic_misuse() {
        let config = Config {
            thresholds: Thresholds::new(0.0, 60.0),
            min_spacing: 1.5,
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "wcag");
        assert_eq!(errors[1].field, "min_spacing");
    }

    #[test]
    fn bool_forms() {
        for v in ["1", "true", "YES", " on "] {
            assert_eq!(parse_bool(v), Some(true));
        }
        for v in ["0", "false", "No", "off"] {
            assert_eq!(parse_bool(v), Some(false));
        }
        assert_eq!(parse_bool("2"), None);
    }
}
