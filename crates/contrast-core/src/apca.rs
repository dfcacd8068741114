#![forbid(unsafe_code)]

//! APCA-W3 lightness contrast (Lc).
//!
//! Port of `APCAcontrast(sRGBtoY(text), sRGBtoY(background))` from the
//! apca-w3 0.1.9 package, using its SA98G constants. Screen luminance uses a
//! plain 2.4 power curve, not the WCAG piecewise transfer function.

use crate::color::Rgb;
use crate::metrics::ApcaProvider;

const MAIN_TRC: f64 = 2.4;
const S_RCO: f64 = 0.212_672_9;
const S_GCO: f64 = 0.715_152_2;
const S_BCO: f64 = 0.072_175_0;

const NORM_BG: f64 = 0.56;
const NORM_TXT: f64 = 0.57;
const REV_TXT: f64 = 0.62;
const REV_BG: f64 = 0.65;

const BLK_THRS: f64 = 0.022;
const BLK_CLMP: f64 = 1.414;
const SCALE_BOW: f64 = 1.14;
const SCALE_WOB: f64 = 1.14;
const LO_BOW_OFFSET: f64 = 0.027;
const LO_WOB_OFFSET: f64 = 0.027;
const DELTA_Y_MIN: f64 = 0.0005;
const LO_CLIP: f64 = 0.1;

/// The APCA-W3 0.1.9 algorithm as an [`ApcaProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApcaW3;

impl ApcaProvider for ApcaW3 {
    fn lc(&self, text: Rgb, background: Rgb) -> f64 {
        apca_contrast(screen_luminance(text), screen_luminance(background))
    }
}

/// Estimated screen luminance (`sRGBtoY`).
#[must_use]
pub fn screen_luminance(color: Rgb) -> f64 {
    let lin = |c: u8| (f64::from(c) / 255.0).powf(MAIN_TRC);
    S_RCO * lin(color.r) + S_GCO * lin(color.g) + S_BCO * lin(color.b)
}

/// Lc from two screen luminances, text first.
///
/// Positive for dark text on a light background, negative for the reverse.
#[must_use]
pub fn apca_contrast(text_y: f64, background_y: f64) -> f64 {
    if !(0.0..=1.1).contains(&text_y) || !(0.0..=1.1).contains(&background_y) {
        return 0.0;
    }

    let txt = soft_clamp_black(text_y);
    let bg = soft_clamp_black(background_y);

    if (bg - txt).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let output = if bg > txt {
        let sapc = (bg.powf(NORM_BG) - txt.powf(NORM_TXT)) * SCALE_BOW;
        if sapc < LO_CLIP { 0.0 } else { sapc - LO_BOW_OFFSET }
    } else {
        let sapc = (bg.powf(REV_BG) - txt.powf(REV_TXT)) * SCALE_WOB;
        if sapc > -LO_CLIP { 0.0 } else { sapc + LO_WOB_OFFSET }
    };

    output * 100.0
}

fn soft_clamp_black(y: f64) -> f64 {
    if y > BLK_THRS {
        y
    } else {
        y + (BLK_THRS - y).powf(BLK_CLMP)
    }
}
