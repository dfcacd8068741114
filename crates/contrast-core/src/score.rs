#![forbid(unsafe_code)]

//! Candidate scoring: distance from the ideal suggestion. Lower is better.
//!
//! A candidate that lands exactly on both thresholds at the base lightness
//! scores zero. Overshooting a threshold is penalized as much as missing it,
//! so the search prefers the smallest change that passes.

use crate::metrics::{ContrastResult, Thresholds};

/// Weight of the lightness drift term.
pub const LIGHTNESS_WEIGHT: f64 = 0.5;

/// Threshold distance shared by all roles.
fn threshold_distance(result: &ContrastResult, thresholds: Thresholds) -> f64 {
    let wcag = (result.ratio - thresholds.wcag).abs();
    let apca = result
        .lc
        .magnitude()
        .map_or(0.0, |lc| (lc - thresholds.apca).abs());
    wcag + apca
}

/// Score a foreground candidate at lightness `l` against a base at `base_l`.
#[must_use]
pub fn foreground_score(result: &ContrastResult, thresholds: Thresholds, l: f64, base_l: f64) -> f64 {
    threshold_distance(result, thresholds) + LIGHTNESS_WEIGHT * (l - base_l).abs()
}

/// Score a focus-indicator candidate. Same shape as the foreground score.
#[must_use]
pub fn focus_score(result: &ContrastResult, thresholds: Thresholds, l: f64, base_l: f64) -> f64 {
    foreground_score(result, thresholds, l, base_l)
}

/// Drift of a background candidate away from the base color in HSL.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackgroundDrift {
    /// Lightness of the candidate minus base lightness.
    pub lightness: f64,
    /// Hue offset applied by the search pass.
    pub hue_offset: f64,
    /// Saturation actually used minus base saturation.
    pub saturation: f64,
}

/// Score a background candidate, additionally penalizing hue and
/// saturation drift.
#[must_use]
pub fn background_score(result: &ContrastResult, thresholds: Thresholds, drift: BackgroundDrift) -> f64 {
    threshold_distance(result, thresholds)
        + LIGHTNESS_WEIGHT * drift.lightness.abs()
        + drift.hue_offset.abs()
        + drift.saturation.abs()
}
