#![forbid(unsafe_code)]

//! Host layer for the `contrast` binary: configuration, argument parsing,
//! report rendering and diagnostics setup around [`contrast_core`].

pub mod cli;
pub mod config;
pub mod logging;
pub mod render;

use std::fmt;

use contrast_core::{
    ContrastMetrics, CssColorParser, EvaluateError, EvaluationRequest, Evaluator, Report,
};

use crate::cli::Opts;
use crate::config::OutputFormat;

/// Rendered output and whether every check passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub passed: bool,
}

/// Failure to produce a report.
#[derive(Debug)]
pub enum RunError {
    Evaluate(EvaluateError),
    Json(serde_json::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluate(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "could not serialize report: {err}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Evaluate(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<EvaluateError> for RunError {
    fn from(err: EvaluateError) -> Self {
        Self::Evaluate(err)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Build the evaluator described by `opts`.
#[must_use]
pub fn evaluator(opts: &Opts) -> Evaluator<CssColorParser> {
    let metrics = if opts.apca {
        ContrastMetrics::apca_w3()
    } else {
        ContrastMetrics::without_apca()
    };
    Evaluator::new(CssColorParser, metrics)
        .with_search_config(config::search_config(opts.count, opts.min_spacing))
}

/// Evaluate the colors in `opts`.
pub fn evaluate(opts: &Opts) -> Result<Report, EvaluateError> {
    let mut request = EvaluationRequest::new(&opts.foreground, &opts.background)
        .with_thresholds(opts.thresholds)
        .with_suggestion_count(opts.count);
    if let Some(focus) = &opts.focus {
        request = request.with_focus(focus);
    }
    evaluator(opts).evaluate(&request)
}

/// Evaluate and render in the requested format.
pub fn run(opts: &Opts) -> Result<Outcome, RunError> {
    let report = evaluate(opts)?;
    tracing::info!(
        passed = report.passed,
        apca = report.apca_available,
        "contrast evaluated"
    );
    let output = match opts.format {
        OutputFormat::Text => render::TextReport(&report).to_string(),
        OutputFormat::Json => render::to_json(&report)?,
    };
    Ok(Outcome {
        output,
        passed: report.passed,
    })
}
