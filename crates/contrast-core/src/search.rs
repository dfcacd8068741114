#![forbid(unsafe_code)]

//! Palette search: nearby colors that pass a contrast requirement.
//!
//! For one role the search holds the partner color fixed and sweeps the
//! lightness of the base color in HSL, optionally desaturating it or nudging
//! its hue. Each pass trades a little more fidelity to the base color for a
//! larger search space, and later passes only run while the earlier ones
//! have not produced enough candidates.
//!
//! # Algorithm
//!
//! 1. Sweep lightness `k * 0.02` for `k in 1..=49` under every
//!    (hue offset, saturation scale) of the current pass. A pass ends early
//!    once a completed sweep leaves `early_stop_factor * count` strict
//!    candidates; a sweep itself always runs to the end.
//! 2. Keep colors whose WCAG ratio meets the threshold. Split them into a
//!    strict bucket (APCA measured and meeting its threshold) and a relaxed
//!    bucket (everything else).
//! 3. Rank the strict bucket by score if it is non-empty, else the relaxed
//!    bucket. Sorting is stable, so sweep order breaks ties.
//! 4. Pick greedily while keeping lightness at least `min_spacing` apart,
//!    then top up from the ranked list ignoring spacing.
//!
//! # Invariants
//!
//! 1. Every returned candidate meets the WCAG threshold.
//! 2. Every candidate in a set comes from the same bucket.
//! 3. No color appears twice in a set.
//! 4. The spaced picks come first; top-up picks follow in rank order.

use std::fmt;

use serde::Serialize;

use crate::color::{Hsl, Rgb};
use crate::metrics::{ContrastMetrics, ContrastResult, Thresholds};
use crate::score::{BackgroundDrift, background_score, focus_score, foreground_score};

pub use crate::error::ColorRole as Role;

/// Lightness step of the sweep.
pub const LIGHTNESS_STEP: f64 = 0.02;
/// Number of lightness samples per sweep (`0.02..=0.98`).
pub const LIGHTNESS_SAMPLES: u32 = 49;
/// Default number of suggestions per role.
pub const DEFAULT_COUNT: usize = 5;
/// Default minimum lightness difference between spaced picks.
pub const DEFAULT_MIN_SPACING: f64 = 0.10;
/// Default multiple of `count` strict candidates that ends a pass early.
pub const DEFAULT_EARLY_STOP_FACTOR: usize = 4;

// Absorbs float error in sweep lightness so 0.4 and 0.3 count as 0.1 apart.
const SPACING_EPSILON: f64 = 1e-9;

/// Tuning for the palette search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchConfig {
    /// Maximum suggestions per role.
    pub count: usize,
    /// Minimum lightness difference between spaced picks, in `[0, 1]`.
    pub min_spacing: f64,
    /// A pass skips its remaining sweeps once `early_stop_factor * count`
    /// strict candidates exist.
    pub early_stop_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            min_spacing: DEFAULT_MIN_SPACING,
            early_stop_factor: DEFAULT_EARLY_STOP_FACTOR,
        }
    }
}

impl SearchConfig {
    /// Copy with a different suggestion count (at least one).
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    /// Check ranges, returning the first offending field and its value.
    pub fn validate(&self) -> Result<(), (&'static str, f64)> {
        if self.count == 0 {
            return Err(("count", 0.0));
        }
        if !(0.0..=1.0).contains(&self.min_spacing) {
            return Err(("min_spacing", self.min_spacing));
        }
        if self.early_stop_factor == 0 {
            return Err(("early_stop_factor", 0.0));
        }
        Ok(())
    }

    fn early_stop_at(&self) -> usize {
        self.early_stop_factor.saturating_mul(self.count)
    }
}

/// Which bucket (or fallback) a suggestion set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTier {
    /// Meets both WCAG and a measured APCA threshold.
    Strict,
    /// Meets WCAG only (APCA failing or unavailable).
    Relaxed,
    /// Generic WCAG-only colors chosen after the search found nothing.
    Fallback,
}

impl SuggestionTier {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for SuggestionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color proposed for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    /// The proposed color.
    pub color: Rgb,
    /// Contrast against the fixed partner, in the role's text/background order.
    pub result: ContrastResult,
    /// Distance from ideal; lower is better.
    pub score: f64,
    /// Sweep lightness that produced the color.
    pub lightness: f64,
    /// Whether the candidate came from the strict bucket.
    pub strict: bool,
}

/// Ranked, spaced suggestions for one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionSet {
    /// Role the colors would replace.
    pub role: Role,
    /// Bucket the colors came from.
    pub tier: SuggestionTier,
    /// Best first, at most `count`.
    pub candidates: Vec<Candidate>,
}

impl SuggestionSet {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when the search found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate over the suggested colors.
    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.candidates.iter().map(|c| c.color)
    }
}

/// One search pass: every hue offset is combined with every saturation scale.
#[derive(Debug, Clone, Copy)]
struct Pass {
    hue_offsets: &'static [f64],
    saturation_scales: &'static [f64],
}

const PASS_BASE: Pass = Pass {
    hue_offsets: &[0.0],
    saturation_scales: &[1.0],
};

const PASS_DESATURATE: Pass = Pass {
    hue_offsets: &[0.0],
    saturation_scales: &[0.9, 0.8, 0.7],
};

const PASS_HUE_SHIFT: Pass = Pass {
    hue_offsets: &[0.03, -0.03, 0.06, -0.06, 0.09, -0.09],
    saturation_scales: &[1.0, 0.9],
};

fn passes_for(role: Role) -> &'static [Pass] {
    match role {
        Role::Foreground => &[PASS_BASE, PASS_DESATURATE],
        Role::Background => &[PASS_BASE, PASS_DESATURATE, PASS_HUE_SHIFT],
        Role::Focus => &[PASS_BASE],
    }
}

/// Suggest replacements for `base` used as text on `background`.
#[must_use]
pub fn search_foreground(
    metrics: &ContrastMetrics,
    base: Rgb,
    background: Rgb,
    thresholds: Thresholds,
    config: &SearchConfig,
) -> SuggestionSet {
    Search {
        metrics,
        role: Role::Foreground,
        base,
        partner: background,
        thresholds,
        config,
    }
    .run(|_| true)
}

/// Suggest replacements for `base` used as the surface under `foreground`.
#[must_use]
pub fn search_background(
    metrics: &ContrastMetrics,
    base: Rgb,
    foreground: Rgb,
    thresholds: Thresholds,
    config: &SearchConfig,
) -> SuggestionSet {
    Search {
        metrics,
        role: Role::Background,
        base,
        partner: foreground,
        thresholds,
        config,
    }
    .run(|_| true)
}

/// Suggest replacements for a focus indicator drawn on `background`.
///
/// Candidates rejected by `extra_check` are dropped before bucketing.
#[must_use]
pub fn search_focus(
    metrics: &ContrastMetrics,
    base: Rgb,
    background: Rgb,
    thresholds: Thresholds,
    config: &SearchConfig,
    extra_check: impl Fn(Rgb) -> bool,
) -> SuggestionSet {
    Search {
        metrics,
        role: Role::Focus,
        base,
        partner: background,
        thresholds,
        config,
    }
    .run(extra_check)
}

/// Lightness levels tried by [`fallback_suggestions`].
pub const FALLBACK_LIGHTNESS: [f64; 5] = [0.15, 0.3, 0.5, 0.7, 0.9];

/// Generic WCAG-only suggestions for when a search came back empty.
///
/// Tries [`FALLBACK_LIGHTNESS`] at the base hue and saturation, then pure
/// black and white if none of those pass. APCA is reported but not required.
/// At most `config.count` colors are returned, and the result may be empty.
#[must_use]
pub fn fallback_suggestions(
    metrics: &ContrastMetrics,
    role: Role,
    base: Rgb,
    partner: Rgb,
    thresholds: Thresholds,
    config: &SearchConfig,
) -> SuggestionSet {
    let search = Search {
        metrics,
        role,
        base,
        partner,
        thresholds,
        config,
    };
    let base_hsl = base.to_hsl();

    let mut candidates: Vec<Candidate> = FALLBACK_LIGHTNESS
        .iter()
        .filter_map(|&l| search.candidate(base_hsl.with_lightness(l), base_hsl, 0.0))
        .collect();
    if candidates.is_empty() {
        candidates = [Rgb::BLACK, Rgb::WHITE]
            .into_iter()
            .filter_map(|color| search.candidate(color.to_hsl(), base_hsl, 0.0))
            .collect();
    }
    candidates.dedup_by_key(|c| c.color);
    candidates.truncate(config.count.max(1));

    crate::debug!(role = %role, found = candidates.len(), "fallback suggestions");
    SuggestionSet {
        role,
        tier: SuggestionTier::Fallback,
        candidates,
    }
}

struct Search<'a> {
    metrics: &'a ContrastMetrics,
    role: Role,
    base: Rgb,
    partner: Rgb,
    thresholds: Thresholds,
    config: &'a SearchConfig,
}

impl Search<'_> {
    fn run(&self, extra_check: impl Fn(Rgb) -> bool) -> SuggestionSet {
        let span = crate::debug_span!("palette_search", role = %self.role, base = %self.base);
        let _guard = span.enter();

        let base_hsl = self.base.to_hsl();
        let count = self.config.count.max(1);
        let early_stop_at = self.config.early_stop_at();
        let mut strict: Vec<Candidate> = Vec::new();
        let mut relaxed: Vec<Candidate> = Vec::new();

        for pass in passes_for(self.role) {
            'pass: for &hue_offset in pass.hue_offsets {
                for &scale in pass.saturation_scales {
                    let swept = Hsl::new(base_hsl.h + hue_offset, base_hsl.s * scale, 0.0);
                    for k in 1..=LIGHTNESS_SAMPLES {
                        let swept = swept.with_lightness(f64::from(k) * LIGHTNESS_STEP);
                        let Some(candidate) = self.candidate(swept, base_hsl, hue_offset) else {
                            continue;
                        };
                        if !extra_check(candidate.color) {
                            continue;
                        }
                        if candidate.strict {
                            strict.push(candidate);
                        } else {
                            relaxed.push(candidate);
                        }
                    }
                    // Only between sweeps; a sweep always finishes.
                    if strict.len() >= early_stop_at {
                        break 'pass;
                    }
                }
            }

            crate::debug!(
                variants = pass.hue_offsets.len() * pass.saturation_scales.len(),
                strict = strict.len(),
                relaxed = relaxed.len(),
                "search pass finished"
            );
            if strict.len() >= count {
                break;
            }
        }

        let (tier, mut bucket) = if strict.is_empty() {
            (SuggestionTier::Relaxed, relaxed)
        } else {
            (SuggestionTier::Strict, strict)
        };
        bucket.sort_by(|a, b| a.score.total_cmp(&b.score));
        let candidates = select_spaced(&bucket, count, self.config.min_spacing);

        crate::debug!(tier = %tier, picked = candidates.len(), "search finished");
        SuggestionSet {
            role: self.role,
            tier,
            candidates,
        }
    }

    /// Measure and score one swept color. `None` if it fails WCAG.
    fn candidate(&self, swept: Hsl, base: Hsl, hue_offset: f64) -> Option<Candidate> {
        let color = swept.to_rgb();
        let result = self.measure(color);
        if !result.wcag_pass {
            return None;
        }
        let drift = BackgroundDrift {
            lightness: swept.l - base.l,
            hue_offset,
            saturation: swept.s - base.s,
        };
        Some(Candidate {
            color,
            result,
            score: self.score(&result, swept.l, base.l, drift),
            lightness: swept.l,
            strict: result.lc.verified_pass(self.thresholds.apca),
        })
    }

    fn measure(&self, candidate: Rgb) -> ContrastResult {
        match self.role {
            Role::Foreground | Role::Focus => {
                self.metrics.contrast(candidate, self.partner, self.thresholds)
            }
            Role::Background => self.metrics.contrast(self.partner, candidate, self.thresholds),
        }
    }

    fn score(&self, result: &ContrastResult, lightness: f64, base_l: f64, drift: BackgroundDrift) -> f64 {
        match self.role {
            Role::Foreground => foreground_score(result, self.thresholds, lightness, base_l),
            Role::Background => background_score(result, self.thresholds, drift),
            Role::Focus => focus_score(result, self.thresholds, lightness, base_l),
        }
    }
}

/// Pick up to `count` candidates from an already ranked list.
///
/// The first phase walks the list in order and takes a candidate only if its
/// lightness is at least `min_spacing` away from every earlier pick. If that
/// yields fewer than `count`, the remaining slots are filled in rank order
/// regardless of spacing. A color is never picked twice.
#[must_use]
pub fn select_spaced(ranked: &[Candidate], count: usize, min_spacing: f64) -> Vec<Candidate> {
    let mut picked: Vec<Candidate> = Vec::with_capacity(count.min(ranked.len()));
    let mut taken = vec![false; ranked.len()];
    let is_duplicate = |picked: &[Candidate], c: &Candidate| picked.iter().any(|p| p.color == c.color);

    for (i, candidate) in ranked.iter().enumerate() {
        if picked.len() >= count {
            break;
        }
        let spaced = picked
            .iter()
            .all(|p| (p.lightness - candidate.lightness).abs() + SPACING_EPSILON >= min_spacing);
        if spaced && !is_duplicate(picked.as_slice(), candidate) {
            picked.push(*candidate);
            taken[i] = true;
        }
    }

    for (i, candidate) in ranked.iter().enumerate() {
        if picked.len() >= count {
            break;
        }
        if !taken[i] && !is_duplicate(picked.as_slice(), candidate) {
            picked.push(*candidate);
        }
    }

    picked
}

#[cfg(all(test, feature = "apca"))]
mod tests {
    use super::*;
    use crate::metrics::{ApcaLc, wcag_ratio};

    fn gray(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn metrics() -> ContrastMetrics {
        ContrastMetrics::apca_w3()
    }

    fn fake(color: Rgb, lightness: f64, score: f64) -> Candidate {
        Candidate {
            color,
            result: ContrastResult::from_measurements(5.0, ApcaLc::Unavailable, Thresholds::default()),
            score,
            lightness,
            strict: false,
        }
    }

    #[test]
    fn foreground_suggestions_for_777777_on_white() {
        let base = gray(0x77);
        let set = search_foreground(&metrics(), base, Rgb::WHITE, Thresholds::default(), &SearchConfig::default());
        assert!(!set.is_empty());
        assert!(set.len() <= DEFAULT_COUNT);
        assert_eq!(set.tier, SuggestionTier::Strict);
        let base_l = base.to_hsl().l;
        for c in &set.candidates {
            assert!(c.result.ratio >= 4.5, "{} has {}", c.color, c.result.ratio);
            assert!(c.strict);
        }
        assert!(set.candidates.iter().any(|c| c.lightness < base_l));
    }

    #[test]
    fn spaced_picks_respect_min_spacing() {
        let set = search_foreground(&metrics(), gray(0x77), Rgb::WHITE, Thresholds::default(), &SearchConfig::default());
        // Sweep for gray on white leaves enough dark candidates for four spaced picks.
        let spaced = &set.candidates[..4];
        for (i, a) in spaced.iter().enumerate() {
            for b in &spaced[i + 1..] {
                assert!((a.lightness - b.lightness).abs() + 1e-9 >= DEFAULT_MIN_SPACING);
            }
        }
    }

    #[test]
    fn without_apca_everything_is_relaxed() {
        let set = search_foreground(
            &ContrastMetrics::without_apca(),
            gray(0x77),
            Rgb::WHITE,
            Thresholds::default(),
            &SearchConfig::default(),
        );
        assert_eq!(set.tier, SuggestionTier::Relaxed);
        assert!(set.candidates.iter().all(|c| !c.strict));
        assert_eq!(set.len(), DEFAULT_COUNT);
    }

    #[test]
    fn impossible_threshold_yields_empty_set() {
        let set = search_foreground(
            &metrics(),
            gray(0x80),
            gray(0x80),
            Thresholds::new(21.5, 60.0),
            &SearchConfig::default(),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn background_search_keeps_foreground_as_text() {
        let fg = Rgb::new(0x45, 0xad, 0x7f);
        let set = search_background(&metrics(), Rgb::new(0x19, 0x33, 0x2a), fg, Thresholds::default(), &SearchConfig::default());
        assert!(!set.is_empty());
        for c in &set.candidates {
            let lc = metrics().apca_lc(fg, c.color);
            assert_eq!(c.result.lc, lc);
            assert!(wcag_ratio(fg, c.color) >= 4.5);
        }
    }

    #[test]
    fn background_search_widens_hue_when_needed() {
        // Only hue-shifted colors measure as strict.
        let base = Rgb::new(0x20, 0x40, 0xC0);
        let base_h = base.to_hsl().h;
        let strict_only_shifted = move |_: Rgb, bg: Rgb| {
            if (bg.to_hsl().h - base_h).abs() > 0.07 { 100.0 } else { 0.0 }
        };
        let set = search_background(
            &ContrastMetrics::new(strict_only_shifted),
            base,
            Rgb::WHITE,
            Thresholds::new(3.0, 60.0),
            &SearchConfig::default(),
        );
        assert_eq!(set.tier, SuggestionTier::Strict);
        for c in &set.candidates {
            assert!(c.result.ratio >= 3.0);
            assert!((c.color.to_hsl().h - base_h).abs() > 0.07, "{}", c.color);
        }
    }

    #[test]
    fn focus_extra_check_filters_candidates() {
        let fg = gray(0x33);
        let set = search_focus(
            &metrics(),
            gray(0xAA),
            Rgb::WHITE,
            Thresholds::new(3.0, 45.0),
            &SearchConfig::default(),
            |c| wcag_ratio(c, fg) >= 3.0,
        );
        for c in &set.candidates {
            assert!(wcag_ratio(c.color, fg) >= 3.0);
            assert!(c.result.ratio >= 3.0);
        }
    }

    #[test]
    fn focus_rejecting_everything_is_empty() {
        let set = search_focus(
            &metrics(),
            gray(0xAA),
            Rgb::WHITE,
            Thresholds::default(),
            &SearchConfig::default(),
            |_| false,
        );
        assert!(set.is_empty());
    }

    #[test]
    fn count_limits_output() {
        let config = SearchConfig::default().with_count(2);
        let set = search_foreground(&metrics(), gray(0x77), Rgb::WHITE, Thresholds::default(), &config);
        assert_eq!(set.len(), 2);
        assert_eq!(SearchConfig::default().with_count(0).count, 1);
    }

    #[test]
    fn select_spaced_prefers_spacing_then_tops_up() {
        let ranked = [
            fake(gray(10), 0.50, 0.1),
            fake(gray(11), 0.52, 0.2),
            fake(gray(12), 0.70, 0.3),
            fake(gray(13), 0.54, 0.4),
        ];
        let picked = select_spaced(&ranked, 3, 0.10);
        let colors: Vec<Rgb> = picked.iter().map(|c| c.color).collect();
        assert_eq!(colors, vec![gray(10), gray(12), gray(11)]);
    }

    #[test]
    fn select_spaced_never_duplicates_colors() {
        let ranked = [
            fake(gray(10), 0.50, 0.1),
            fake(gray(10), 0.80, 0.2),
            fake(gray(10), 0.52, 0.3),
        ];
        let picked = select_spaced(&ranked, 3, 0.10);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn spacing_tolerates_sweep_rounding() {
        let ranked = [
            fake(gray(1), 20.0 * LIGHTNESS_STEP, 0.1),
            fake(gray(2), 0.35, 0.2),
            fake(gray(3), 15.0 * LIGHTNESS_STEP, 0.3),
        ];
        let picked = select_spaced(&ranked, 2, 0.10);
        assert_eq!(picked[1].color, gray(3));
    }

    #[test]
    fn config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        let bad = SearchConfig {
            min_spacing: 1.5,
            ..SearchConfig::default()
        };
        assert_eq!(bad.validate(), Err(("min_spacing", 1.5)));
        let zero = SearchConfig {
            count: 0,
            ..SearchConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn fallback_uses_fixed_lightness_levels() {
        let base = Rgb::new(0x80, 0x40, 0x40);
        let set = fallback_suggestions(
            &metrics(),
            Role::Foreground,
            base,
            Rgb::WHITE,
            Thresholds::new(4.5, 200.0),
            &SearchConfig::default(),
        );
        assert_eq!(set.tier, SuggestionTier::Fallback);
        assert!(!set.is_empty());
        for c in &set.candidates {
            assert!(FALLBACK_LIGHTNESS.contains(&c.lightness));
            assert!(c.result.wcag_pass);
            assert!(!c.strict);
        }
    }

    #[test]
    fn fallback_reaches_black_and_white() {
        // No fixed lightness of a gray reaches 4.5:1 against #767676.
        let set = fallback_suggestions(
            &ContrastMetrics::without_apca(),
            Role::Background,
            gray(0x76),
            gray(0x76),
            Thresholds::new(4.5, 60.0),
            &SearchConfig::default(),
        );
        let colors: Vec<Rgb> = set.colors().collect();
        assert_eq!(colors, vec![Rgb::BLACK, Rgb::WHITE]);
    }

    #[test]
    fn fallback_respects_count() {
        let set = fallback_suggestions(
            &ContrastMetrics::without_apca(),
            Role::Foreground,
            gray(0x76),
            gray(0x76),
            Thresholds::new(4.5, 60.0),
            &SearchConfig::default().with_count(1),
        );
        let colors: Vec<Rgb> = set.colors().collect();
        assert_eq!(colors, vec![Rgb::BLACK]);
    }

    #[test]
    fn top_pick_lands_near_the_threshold() {
        for count in [2, DEFAULT_COUNT] {
            let config = SearchConfig::default().with_count(count);
            let set = search_foreground(&metrics(), gray(0x77), Rgb::WHITE, Thresholds::default(), &config);
            let best = set.candidates[0];
            assert!(best.result.ratio >= 4.5);
            assert!(best.result.ratio - 4.5 < 0.5, "count {count}: {} at {}", best.color, best.result.ratio);
        }
    }

    #[test]
    fn early_stop_waits_for_the_sweep_to_finish() {
        let config = SearchConfig {
            count: 1,
            early_stop_factor: 1,
            ..SearchConfig::default()
        };
        let set = search_foreground(&metrics(), gray(0x77), Rgb::WHITE, Thresholds::default(), &config);
        assert_eq!(set.colors().collect::<Vec<_>>(), vec![gray(0x75)]);
    }
}
