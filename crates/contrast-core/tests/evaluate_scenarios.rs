//! End-to-end scenarios through the public evaluator API.

#![cfg(feature = "apca")]

use std::sync::Arc;
use std::thread;

use contrast_core::{
    ApcaVerdict, ContrastMetrics, CssColorParser, EvaluationRequest, Evaluator, RoleSuggestions,
    SearchConfig, SuggestionTier, Thresholds, WCAG_AAA, wcag_ratio,
};

#[test]
fn aa_boundary_gray_pair() {
    let evaluator = Evaluator::default();

    let pass = evaluator
        .evaluate(&EvaluationRequest::new("#767676", "#FFFFFF"))
        .unwrap();
    assert!(pass.base.wcag_pass);
    assert!((pass.base.ratio - 4.54).abs() < 0.01);

    let fail = evaluator
        .evaluate(&EvaluationRequest::new("#777777", "#FFFFFF"))
        .unwrap();
    assert!(!fail.base.wcag_pass);
    assert!((fail.base.ratio - 4.48).abs() < 0.01);
}

#[test]
fn extremes_have_exact_ratios() {
    let evaluator = Evaluator::default();
    let same = evaluator
        .evaluate(&EvaluationRequest::new("#000000", "#000000"))
        .unwrap();
    assert_eq!(same.base.ratio, 1.0);
    assert!(!same.passed);

    let max = evaluator
        .evaluate(&EvaluationRequest::new("#FFFFFF", "#000000"))
        .unwrap();
    assert_eq!(max.base.ratio, 21.0);
    assert!(max.passed);
}

#[test]
fn css_syntaxes_resolve_to_the_same_pair() {
    let evaluator = Evaluator::default();
    let inputs = [
        ("#336699", "white"),
        ("rgb(51, 102, 153)", "#fff"),
        ("rgb(51 102 153 / 50%)", "rgba(255,255,255,1)"),
        ("hsl(210, 50%, 40%)", "hsl(0 0% 100%)"),
    ];
    let ratios: Vec<f64> = inputs
        .iter()
        .map(|(fg, bg)| evaluator.evaluate(&EvaluationRequest::new(fg, bg)).unwrap().base.ratio)
        .collect();
    for r in &ratios {
        assert!((r - ratios[0]).abs() < 1e-9, "{ratios:?}");
    }
}

#[test]
fn aaa_request_gets_darker_foregrounds() {
    let request = EvaluationRequest::new("#3366CC", "#FFFFFF")
        .with_thresholds(Thresholds::new(WCAG_AAA, 75.0))
        .with_suggestion_count(3);
    let report = Evaluator::default().evaluate(&request).unwrap();
    assert!(!report.passed);

    let set = report.suggestions.foreground.set().expect("foreground suggestions");
    assert!(set.len() <= 3);
    let base_l = report.foreground.to_hsl().l;
    for c in &set.candidates {
        assert!(wcag_ratio(c.color, report.background) >= WCAG_AAA);
        assert!(c.lightness < base_l);
    }
}

#[test]
fn apca_unavailable_never_fails_and_never_claims_verified() {
    let evaluator = Evaluator::new(CssColorParser, ContrastMetrics::without_apca());
    let request = EvaluationRequest::new("#777777", "#FFFFFF").with_focus("#0000FF");
    let report = evaluator.evaluate(&request).unwrap();

    assert_eq!(report.base.apca_verdict, ApcaVerdict::Unverified);
    let focus = report.focus_pair.expect("focus pair");
    assert!(focus.against_background.apca_pass);
    assert_eq!(focus.against_background.apca_verdict, ApcaVerdict::Unverified);

    let set = report.suggestions.foreground.set().expect("foreground suggestions");
    assert_eq!(set.tier, SuggestionTier::Relaxed);
}

#[test]
fn search_config_is_honored() {
    let evaluator = Evaluator::default().with_search_config(SearchConfig {
        count: 2,
        min_spacing: 0.2,
        ..SearchConfig::default()
    });
    let report = evaluator
        .evaluate(&EvaluationRequest::new("#777777", "#FFFFFF"))
        .unwrap();
    let set = report.suggestions.foreground.set().expect("foreground suggestions");
    assert_eq!(set.len(), 2);
    assert!((set.candidates[0].lightness - set.candidates[1].lightness).abs() + 1e-9 >= 0.2);
}

#[test]
fn focus_delta_boundary_is_inclusive() {
    // Blue focus ring next to black text on white.
    let report = Evaluator::default()
        .evaluate(&EvaluationRequest::new("#000000", "#FFFFFF").with_focus("#0000FF"))
        .unwrap();
    let focus = report.focus_pair.expect("focus pair");
    let delta = wcag_ratio(report.foreground, report.focus.unwrap());
    assert_eq!(focus.delta_passes(), delta >= 3.0);
    assert_eq!(focus.delta.ratio, delta);
}

#[test]
fn passing_triple_has_no_suggestions() {
    let report = Evaluator::default()
        .evaluate(&EvaluationRequest::new("#000000", "#FFFFFF").with_focus("#767676"))
        .unwrap();
    assert!(report.passed, "{}", report.summary_text());
    assert_eq!(report.suggestions.foreground, RoleSuggestions::NotSearched);
    assert_eq!(report.suggestions.focus, RoleSuggestions::NotSearched);
    assert!(report.summary_text().contains("which meets the 3:1 requirement"));
}

#[test]
fn evaluator_is_shareable_across_threads() {
    let evaluator = Arc::new(Evaluator::default());
    let handles: Vec<_> = ["#111111", "#777777", "#AAAAAA", "#EEEEEE"]
        .into_iter()
        .map(|fg| {
            let evaluator = Arc::clone(&evaluator);
            thread::spawn(move || {
                evaluator
                    .evaluate(&EvaluationRequest::new(fg, "#FFFFFF"))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        let report = handle.join().unwrap();
        let again = evaluator
            .evaluate(&EvaluationRequest::new(&report.foreground.to_hex(), "#FFFFFF"))
            .unwrap();
        assert_eq!(report, again);
    }
}
