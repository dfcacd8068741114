#![forbid(unsafe_code)]

//! Text and JSON rendering of a [`Report`].

use std::fmt;

use contrast_core::{ApcaVerdict, ContrastResult, Report, RoleSuggestions, format_ratio};
use serde::Serialize;

const LABEL_WIDTH: usize = 36;

/// Plain-text rendering, one section per concern.
pub struct TextReport<'a>(pub &'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Foreground  {}", report.foreground)?;
        writeln!(f, "Background  {}", report.background)?;
        if let Some(focus) = report.focus {
            writeln!(f, "Focus       {focus}")?;
        }
        writeln!(
            f,
            "Thresholds  WCAG {}, APCA Lc {}",
            format_ratio(report.thresholds.wcag),
            report.thresholds.apca
        )?;
        writeln!(f)?;

        writeln!(f, "{:<LABEL_WIDTH$}{:<16}{}", "Pair", "WCAG", "APCA")?;
        result_row(f, "Foreground and background", &report.base, true)?;
        if let Some(pair) = &report.focus_pair {
            result_row(f, "Focus and background", &pair.against_background, true)?;
            result_row(f, "Foreground and focus (focus delta)", &pair.delta, false)?;
            writeln!(f)?;
            let state = if pair.delta_passes() {
                "is satisfied"
            } else {
                "is not satisfied"
            };
            writeln!(
                f,
                "Focus appearance requirement of 3:1 between unfocused and focused state {state}: contrast is {}.",
                format_ratio(pair.delta.ratio)
            )?;
        }

        for (label, suggestions) in [
            ("Foreground", &report.suggestions.foreground),
            ("Background", &report.suggestions.background),
            ("Focus", &report.suggestions.focus),
        ] {
            let RoleSuggestions::Found(set) = suggestions else {
                continue;
            };
            writeln!(f)?;
            writeln!(f, "{label} suggestions ({}):", set.tier)?;
            for c in &set.candidates {
                writeln!(
                    f,
                    "  {}  {:>8}  APCA {:>6}",
                    c.color,
                    format_ratio(c.result.ratio),
                    c.result.lc.to_string()
                )?;
            }
        }

        writeln!(f)?;
        for sentence in &report.summary {
            writeln!(f, "{sentence}")?;
        }
        write!(f, "Result: {}", if report.passed { "PASS" } else { "FAIL" })
    }
}

fn result_row(f: &mut fmt::Formatter<'_>, label: &str, result: &ContrastResult, judge_apca: bool) -> fmt::Result {
    let wcag = format!(
        "{} {}",
        format_ratio(result.ratio),
        if result.wcag_pass { "Pass" } else { "Fail" }
    );
    let apca = if judge_apca {
        let verdict = match result.apca_verdict {
            ApcaVerdict::Pass => "Pass",
            ApcaVerdict::Fail => "Fail",
            ApcaVerdict::Unverified => "Unverified",
        };
        format!("{} {verdict}", result.lc)
    } else {
        format!("{} (not judged)", result.lc)
    };
    writeln!(f, "{label:<LABEL_WIDTH$}{wcag:<16}{apca}")
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    version: &'static str,
    #[serde(flatten)]
    report: &'a Report,
}

/// Pretty-printed JSON with the tool version alongside the report fields.
pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput {
        version: crate::cli::VERSION,
        report,
    })
}
