#![forbid(unsafe_code)]

//! Evaluation of a color pair (or triple) and the suggestion phase.
//!
//! [`Evaluator::evaluate`] is the one entry point hosts need: it parses the
//! inputs, measures the base pair and the optional focus pair, searches for
//! replacements only when something failed, and returns a [`Report`].

use serde::Serialize;

use crate::color::Rgb;
use crate::error::{ColorRole, EvaluateError};
use crate::metrics::{
    ApcaLc, ContrastMetrics, ContrastResult, FOCUS_APPEARANCE_RATIO, Thresholds, format_ratio,
    wcag_ratio,
};
use crate::parse::{ColorParser, CssColorParser};
use crate::search::{
    self, Role, SearchConfig, SuggestionSet, SuggestionTier, fallback_suggestions,
};

/// Inputs for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRequest<'a> {
    /// Text color, any syntax the parser accepts.
    pub foreground: &'a str,
    /// Surface color.
    pub background: &'a str,
    /// Optional focus-indicator color. Blank strings count as absent.
    pub focus: Option<&'a str>,
    /// Pass thresholds.
    pub thresholds: Thresholds,
    /// Suggestions per role; the evaluator's search config when `None`.
    pub suggestion_count: Option<usize>,
}

impl<'a> EvaluationRequest<'a> {
    /// Request for a foreground/background pair with default thresholds.
    #[must_use]
    pub fn new(foreground: &'a str, background: &'a str) -> Self {
        Self {
            foreground,
            background,
            focus: None,
            thresholds: Thresholds::default(),
            suggestion_count: None,
        }
    }

    /// Add a focus-indicator color.
    #[must_use]
    pub fn with_focus(mut self, focus: &'a str) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Use different thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Ask for a different number of suggestions per role.
    #[must_use]
    pub fn with_suggestion_count(mut self, count: usize) -> Self {
        self.suggestion_count = Some(count);
        self
    }
}

/// Outcome of the suggestion phase for one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoleSuggestions {
    /// Nothing failed for this role, so no search ran.
    NotSearched,
    /// The search (and fallback, where it applies) produced nothing.
    NoneFound,
    /// At least one suggestion.
    Found(SuggestionSet),
}

impl RoleSuggestions {
    fn from_set(set: SuggestionSet) -> Self {
        if set.is_empty() {
            Self::NoneFound
        } else {
            Self::Found(set)
        }
    }

    /// The suggestions, if any were found.
    #[must_use]
    pub fn set(&self) -> Option<&SuggestionSet> {
        match self {
            Self::Found(set) => Some(set),
            Self::NotSearched | Self::NoneFound => None,
        }
    }

    /// Whether a search ran for this role.
    #[must_use]
    pub fn was_searched(&self) -> bool {
        !matches!(self, Self::NotSearched)
    }
}

/// Suggestions for every role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestions {
    /// Replacements for the text color.
    pub foreground: RoleSuggestions,
    /// Replacements for the surface color.
    pub background: RoleSuggestions,
    /// Replacements for the focus indicator.
    pub focus: RoleSuggestions,
}

impl Default for Suggestions {
    fn default() -> Self {
        Self {
            foreground: RoleSuggestions::NotSearched,
            background: RoleSuggestions::NotSearched,
            focus: RoleSuggestions::NotSearched,
        }
    }
}

/// Focus indicator measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusReport {
    /// Focus color drawn on the background, against the request thresholds.
    pub against_background: ContrastResult,
    /// Foreground against focus color, judged at 3:1 with APCA not judged.
    pub delta: ContrastResult,
}

impl FocusReport {
    /// Whether the 3:1 focus appearance requirement holds.
    #[must_use]
    pub const fn delta_passes(&self) -> bool {
        self.delta.wcag_pass
    }

    /// Both the background pair and the delta pass.
    #[must_use]
    pub const fn passes(&self) -> bool {
        self.against_background.passes() && self.delta_passes()
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Parsed text color.
    pub foreground: Rgb,
    /// Parsed surface color.
    pub background: Rgb,
    /// Parsed focus color, if one was given.
    pub focus: Option<Rgb>,
    /// Thresholds used.
    pub thresholds: Thresholds,
    /// Foreground on background.
    pub base: ContrastResult,
    /// Present when a focus color was given.
    pub focus_pair: Option<FocusReport>,
    /// Suggestion phase outcome per role.
    pub suggestions: Suggestions,
    /// Whether APCA was measured. When false every APCA pass is unverified.
    pub apca_available: bool,
    /// Every check passed (APCA optimistically when unavailable).
    pub passed: bool,
    /// Human-readable sentences, in reporting order.
    pub summary: Vec<String>,
}

impl Report {
    /// Summary sentences joined with spaces.
    #[must_use]
    pub fn summary_text(&self) -> String {
        self.summary.join(" ")
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parses, measures and suggests.
///
/// Holds no mutable state; one evaluator can serve any number of requests,
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Evaluator<P = CssColorParser> {
    parser: P,
    metrics: ContrastMetrics,
    search: SearchConfig,
}

impl Default for Evaluator<CssColorParser> {
    /// CSS parser, with APCA-W3 when the `apca` feature is enabled.
    fn default() -> Self {
        #[cfg(feature = "apca")]
        let metrics = ContrastMetrics::apca_w3();
        #[cfg(not(feature = "apca"))]
        let metrics = ContrastMetrics::without_apca();
        Self::new(CssColorParser, metrics)
    }
}

impl<P: ColorParser> Evaluator<P> {
    /// Evaluator with the default search configuration.
    #[must_use]
    pub fn new(parser: P, metrics: ContrastMetrics) -> Self {
        Self {
            parser,
            metrics,
            search: SearchConfig::default(),
        }
    }

    /// Replace the search configuration.
    #[must_use]
    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    /// The metrics in use.
    #[must_use]
    pub fn metrics(&self) -> &ContrastMetrics {
        &self.metrics
    }

    /// The search configuration in use.
    #[must_use]
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Evaluate one request.
    ///
    /// # Errors
    ///
    /// [`EvaluateError::Parse`] if a color cannot be parsed, and
    /// [`EvaluateError::InvalidThreshold`] if a threshold is not a positive
    /// finite number. No partial report is produced.
    pub fn evaluate(&self, request: &EvaluationRequest<'_>) -> Result<Report, EvaluateError> {
        let span = crate::debug_span!("evaluate", focus = request.focus.is_some());
        let _guard = span.enter();

        let foreground = self.parse(ColorRole::Foreground, request.foreground)?;
        let background = self.parse(ColorRole::Background, request.background)?;
        let focus = match request.focus {
            Some(input) if !input.trim().is_empty() => Some(self.parse(ColorRole::Focus, input)?),
            _ => None,
        };
        let thresholds = request.thresholds;
        thresholds
            .validate()
            .map_err(|(name, value)| EvaluateError::InvalidThreshold { name, value })?;

        let base = self.metrics.contrast(foreground, background, thresholds);
        let focus_pair = focus.map(|focus| FocusReport {
            against_background: self.metrics.contrast(focus, background, thresholds),
            delta: self
                .metrics
                .contrast(foreground, focus, Thresholds::focus_appearance()),
        });

        let config = self
            .search
            .with_count(request.suggestion_count.unwrap_or(self.search.count));
        let mut suggestions = Suggestions::default();

        if !base.passes() {
            suggestions.foreground = self.suggest(Role::Foreground, foreground, background, thresholds, &config);
            suggestions.background = self.suggest(Role::Background, background, foreground, thresholds, &config);
        }
        if let (Some(focus), Some(pair)) = (focus, focus_pair)
            && !pair.passes()
        {
            let set = search::search_focus(&self.metrics, focus, background, thresholds, &config, |c| {
                wcag_ratio(c, foreground) >= FOCUS_APPEARANCE_RATIO
            });
            suggestions.focus = RoleSuggestions::from_set(set);
        }

        let passed = base.passes() && focus_pair.as_ref().is_none_or(FocusReport::passes);
        let apca_available = self.metrics.apca_available();
        let summary = summarize(&base, focus_pair.as_ref(), &suggestions, apca_available);

        crate::debug!(passed, ratio = base.ratio, "evaluation finished");
        Ok(Report {
            foreground,
            background,
            focus,
            thresholds,
            base,
            focus_pair,
            suggestions,
            apca_available,
            passed,
            summary,
        })
    }

    fn parse(&self, role: ColorRole, input: &str) -> Result<Rgb, EvaluateError> {
        self.parser
            .parse(input)
            .map_err(|source| EvaluateError::Parse { role, source })
    }

    /// Search one role and fall back to generic colors when nothing turns up.
    fn suggest(
        &self,
        role: Role,
        base: Rgb,
        partner: Rgb,
        thresholds: Thresholds,
        config: &SearchConfig,
    ) -> RoleSuggestions {
        let set = match role {
            Role::Foreground => search::search_foreground(&self.metrics, base, partner, thresholds, config),
            Role::Background => search::search_background(&self.metrics, base, partner, thresholds, config),
            Role::Focus => return RoleSuggestions::NotSearched,
        };
        if !set.is_empty() {
            return RoleSuggestions::Found(set);
        }
        RoleSuggestions::from_set(fallback_suggestions(
            &self.metrics,
            role,
            base,
            partner,
            thresholds,
            config,
        ))
    }
}

fn pass_word(pass: bool) -> &'static str {
    if pass { "passes" } else { "fails" }
}

fn pair_sentence(label: &str, result: &ContrastResult) -> String {
    let apca = match result.lc {
        ApcaLc::Value(_) => format!("APCA Lc {} {}", result.lc, pass_word(result.apca_pass)),
        ApcaLc::Unavailable => "APCA Lc n/a".to_string(),
    };
    format!(
        "{label}: WCAG ratio {} {}, {apca}.",
        format_ratio(result.ratio),
        pass_word(result.wcag_pass)
    )
}

fn suggestion_sentence(role: Role, suggestions: &RoleSuggestions, apca_available: bool) -> Option<String> {
    let sentence = match (role, suggestions) {
        (_, RoleSuggestions::NotSearched) => return None,
        (Role::Foreground, RoleSuggestions::NoneFound) => {
            "No nearby foreground colors found that satisfy thresholds by adjusting lightness only."
                .to_string()
        }
        (Role::Background, RoleSuggestions::NoneFound) => "No nearby background colors found that satisfy \
             thresholds by adjusting lightness, saturation, and hue within a narrow range."
            .to_string(),
        (Role::Focus, RoleSuggestions::NoneFound) => "No nearby focus colors found that satisfy both \
             thresholds and the 3:1 focus requirement by adjusting lightness only."
            .to_string(),
        (role, RoleSuggestions::Found(set)) => match set.tier {
            SuggestionTier::Fallback => format!(
                "{} options were widened to use WCAG-only candidates so that at least some \
                 suggestions are always available.",
                capitalize(role.as_str())
            ),
            SuggestionTier::Relaxed if apca_available => format!(
                "Suggested {} {role} alternatives that meet the WCAG threshold; none also met \
                 the APCA threshold.",
                set.len()
            ),
            SuggestionTier::Relaxed => format!(
                "Suggested {} {role} alternatives that meet the WCAG threshold; APCA could not \
                 be checked.",
                set.len()
            ),
            SuggestionTier::Strict => match role {
                Role::Foreground => format!(
                    "Suggested {} foreground alternatives that stay close in hue and saturation \
                     and near the chosen thresholds.",
                    set.len()
                ),
                Role::Background => format!(
                    "Suggested {} background alternatives that stay visually close while aligning \
                     better with WCAG and APCA thresholds.",
                    set.len()
                ),
                Role::Focus => format!(
                    "Suggested {} focus color alternatives that meet the 3:1 focus requirement \
                     and stay close to the original focus color.",
                    set.len()
                ),
            },
        },
    };
    Some(sentence)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn summarize(
    base: &ContrastResult,
    focus: Option<&FocusReport>,
    suggestions: &Suggestions,
    apca_available: bool,
) -> Vec<String> {
    let mut summary = vec![pair_sentence("Foreground and background", base)];

    if let Some(focus) = focus {
        summary.push(pair_sentence("Focus color on background", &focus.against_background));
        let verdict = if focus.delta_passes() {
            "meets"
        } else {
            "does not meet"
        };
        summary.push(format!(
            "Focus contrast between foreground and focus color is {}, which {verdict} the 3:1 requirement.",
            format_ratio(focus.delta.ratio)
        ));
    }

    if !apca_available {
        summary.push("APCA could not be verified; APCA checks are reported as passing.".to_string());
    }

    summary.extend(
        [
            (Role::Foreground, &suggestions.foreground),
            (Role::Background, &suggestions.background),
            (Role::Focus, &suggestions.focus),
        ]
        .into_iter()
        .filter_map(|(role, s)| suggestion_sentence(role, s, apca_available)),
    );
    summary
}

#[cfg(all(test, feature = "apca"))]
mod tests {
    use super::*;
    use crate::error::ParseReason;
    use crate::metrics::ApcaVerdict;

    fn evaluator() -> Evaluator {
        Evaluator::default()
    }

    #[test]
    fn passing_pair_skips_suggestions() {
        let report = evaluator()
            .evaluate(&EvaluationRequest::new("#767676", "#FFFFFF"))
            .unwrap();
        assert!(report.passed);
        assert!((report.base.ratio - 4.54).abs() < 0.01);
        assert_eq!(report.suggestions, Suggestions::default());
        assert_eq!(report.summary.len(), 1);
        assert!(report.summary[0].contains("4.54:1 passes"), "{}", report.summary[0]);
    }

    #[test]
    fn failing_pair_searches_foreground_and_background() {
        let report = evaluator()
            .evaluate(&EvaluationRequest::new("#777777", "white"))
            .unwrap();
        assert!(!report.passed);
        assert!(!report.base.wcag_pass);

        let fg = report.suggestions.foreground.set().expect("foreground suggestions");
        let base_l = report.foreground.to_hsl().l;
        assert!(fg.candidates.iter().all(|c| c.result.ratio >= 4.5));
        assert!(fg.candidates.iter().any(|c| c.lightness < base_l));
        assert!(report.suggestions.background.was_searched());
        assert_eq!(report.suggestions.focus, RoleSuggestions::NotSearched);
        assert!(report.summary_text().contains("foreground alternatives"));
    }

    #[test]
    fn focus_delta_boundary_and_search() {
        let request = EvaluationRequest::new("#333333", "#FFFFFF").with_focus("#AAAAAA");
        let report = evaluator().evaluate(&request).unwrap();
        let pair = report.focus_pair.expect("focus pair");

        let delta = wcag_ratio(Rgb::new(0x33, 0x33, 0x33), Rgb::new(0xAA, 0xAA, 0xAA));
        assert_eq!(pair.delta_passes(), delta >= 3.0);
        assert!(pair.delta_passes());
        assert!(!pair.against_background.wcag_pass);

        // Gray on white cannot reach 4.5:1 and stay 3:1 away from #333333.
        assert_eq!(report.suggestions.focus, RoleSuggestions::NoneFound);
        assert_eq!(report.suggestions.foreground, RoleSuggestions::NotSearched);
        assert!(!report.passed);
        assert!(report.summary_text().contains("No nearby focus colors"));
    }

    #[test]
    fn focus_delta_never_fails_on_apca() {
        let request = EvaluationRequest::new("#000000", "#FFFFFF").with_focus("#777777");
        let report = evaluator().evaluate(&request).unwrap();
        let pair = report.focus_pair.expect("focus pair");
        assert!(pair.delta.apca_pass);
        assert!(pair.delta.lc.is_available());
    }

    #[test]
    fn blank_focus_is_ignored() {
        let request = EvaluationRequest::new("#000", "#fff").with_focus("   ");
        let report = evaluator().evaluate(&request).unwrap();
        assert!(report.focus.is_none());
        assert!(report.focus_pair.is_none());
    }

    #[test]
    fn parse_error_names_role_and_input() {
        let err = evaluator()
            .evaluate(&EvaluationRequest::new("#000", "notacolor"))
            .unwrap_err();
        match err {
            EvaluateError::Parse { role, source } => {
                assert_eq!(role, ColorRole::Background);
                assert_eq!(source.input, "notacolor");
                assert_eq!(source.reason, ParseReason::UnknownName);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let request = EvaluationRequest::new("#000", "#fff").with_thresholds(Thresholds::new(4.5, -1.0));
        let err = evaluator().evaluate(&request).unwrap_err();
        assert_eq!(err, EvaluateError::InvalidThreshold { name: "apca", value: -1.0 });
    }

    #[test]
    fn without_apca_reports_unverified() {
        let evaluator = Evaluator::new(CssColorParser, ContrastMetrics::without_apca());
        let report = evaluator
            .evaluate(&EvaluationRequest::new("#767676", "#FFFFFF"))
            .unwrap();
        assert!(report.passed);
        assert!(!report.apca_available);
        assert_eq!(report.base.apca_verdict, ApcaVerdict::Unverified);
        assert!(report.summary_text().contains("APCA could not be verified"));
    }

    #[test]
    fn identical_colors_get_suggestions() {
        let request = EvaluationRequest::new("#808080", "#808080").with_suggestion_count(3);
        let report = evaluator().evaluate(&request).unwrap();
        assert_eq!(report.base.ratio, 1.0);
        let fg = report.suggestions.foreground.set().expect("foreground suggestions");
        assert!(fg.len() <= 3);
        assert!(fg.candidates.iter().all(|c| c.result.wcag_pass));
    }

    #[test]
    fn fallback_honors_suggestion_count() {
        let request = EvaluationRequest::new("#767676", "#767676").with_suggestion_count(1);
        let report = evaluator().evaluate(&request).unwrap();
        for role in [&report.suggestions.foreground, &report.suggestions.background] {
            let set = role.set().expect("fallback suggestions");
            assert_eq!(set.tier, SuggestionTier::Fallback);
            assert_eq!(set.len(), 1);
        }
    }

    #[test]
    fn relaxed_sentence_without_apca_says_unchecked() {
        let evaluator = Evaluator::new(CssColorParser, ContrastMetrics::without_apca());
        let report = evaluator
            .evaluate(&EvaluationRequest::new("#777777", "#FFFFFF"))
            .unwrap();
        let summary = report.summary_text();
        assert!(summary.contains("APCA could not be checked"), "{summary}");
        assert!(!summary.contains("none also met"), "{summary}");
    }

    #[test]
    fn apca_only_failure_triggers_search() {
        let request = EvaluationRequest::new("#767676", "#FFFFFF").with_thresholds(Thresholds::new(4.5, 90.0));
        let report = evaluator().evaluate(&request).unwrap();
        assert!(report.base.wcag_pass);
        assert!(!report.base.apca_pass);
        assert!(report.suggestions.foreground.was_searched());
    }

    #[test]
    fn closure_parser_is_accepted() {
        let parser = |input: &str| -> Result<Rgb, crate::error::ColorParseError> {
            Ok(if input == "ink" { Rgb::BLACK } else { Rgb::WHITE })
        };
        let report = Evaluator::new(parser, ContrastMetrics::without_apca())
            .evaluate(&EvaluationRequest::new("ink", "paper"))
            .unwrap();
        assert_eq!(report.base.ratio, 21.0);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = evaluator()
            .evaluate(&EvaluationRequest::new("#777777", "#FFFFFF"))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["foreground"], "#777777");
        assert_eq!(json["passed"], false);
        assert_eq!(json["suggestions"]["focus"]["status"], "not_searched");
        assert_eq!(json["suggestions"]["foreground"]["status"], "found");
        assert!(json["suggestions"]["foreground"]["candidates"].is_array());
    }
}
