#![forbid(unsafe_code)]

//! WCAG 2.x contrast ratio and APCA lightness contrast.
//!
//! The WCAG ratio is computed here. APCA Lc is delegated to an
//! [`ApcaProvider`] chosen when a [`ContrastMetrics`] is built; a metrics
//! value built without one reports [`ApcaLc::Unavailable`] for every pair and
//! never fails a check on APCA grounds.
//!
//! # Invariants
//!
//! 1. `wcag_ratio(a, b) == wcag_ratio(b, a)` and the result lies in `[1, 21]`.
//! 2. APCA is polarity-sensitive: `apca_lc(text, bg)` and `apca_lc(bg, text)`
//!    differ in sign and magnitude.
//! 3. An unavailable Lc always passes, and is reported as
//!    [`ApcaVerdict::Unverified`] rather than [`ApcaVerdict::Pass`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::ser::Serializer;

use crate::color::Rgb;

/// WCAG 2.x AA threshold for large text and UI components.
pub const WCAG_AA_LARGE: f64 = 3.0;
/// WCAG 2.x AA threshold for body text.
pub const WCAG_AA: f64 = 4.5;
/// WCAG 2.x AAA threshold for body text.
pub const WCAG_AAA: f64 = 7.0;
/// Representative APCA |Lc| for content text.
pub const APCA_CONTENT_TEXT: f64 = 60.0;
/// Minimum ratio between the unfocused and focused states of a component.
pub const FOCUS_APPEARANCE_RATIO: f64 = 3.0;

/// Convert an sRGB channel (0–255) to linear light.
#[must_use]
pub fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance, `0.0` (black) to `1.0` (white).
#[must_use]
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * srgb_to_linear(color.r)
        + 0.7152 * srgb_to_linear(color.g)
        + 0.0722 * srgb_to_linear(color.b)
}

/// WCAG contrast ratio between two colors. Order does not matter.
#[must_use]
pub fn wcag_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let lighter = la.max(lb);
    let darker = la.min(lb);
    (lighter + 0.05) / (darker + 0.05)
}

/// Format a ratio as `"4.54:1"`, or `"n/a"` if it is not finite.
#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{ratio:.2}:1")
    } else {
        "n/a".to_string()
    }
}

/// Pass thresholds for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Minimum WCAG ratio (e.g. 3.0, 4.5, 7.0).
    pub wcag: f64,
    /// Minimum APCA |Lc| (typically 45–90).
    pub apca: f64,
}

impl Thresholds {
    /// Create a threshold pair.
    #[must_use]
    pub const fn new(wcag: f64, apca: f64) -> Self {
        Self { wcag, apca }
    }

    /// Thresholds for the focus-appearance delta: 3:1, APCA not judged.
    #[must_use]
    pub const fn focus_appearance() -> Self {
        Self::new(FOCUS_APPEARANCE_RATIO, 0.0)
    }

    /// Return the name of the first threshold that is not a positive finite
    /// number, with its value.
    pub fn validate(&self) -> Result<(), (&'static str, f64)> {
        if !self.wcag.is_finite() || self.wcag <= 0.0 {
            return Err(("wcag", self.wcag));
        }
        if !self.apca.is_finite() || self.apca <= 0.0 {
            return Err(("apca", self.apca));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(WCAG_AA, APCA_CONTENT_TEXT)
    }
}

/// Signed APCA lightness contrast, or unavailable.
///
/// Positive values are dark text on a light background; negative values are
/// light text on a dark background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApcaLc {
    /// Lc computed by the provider.
    Value(f64),
    /// No APCA provider is loaded.
    Unavailable,
}

impl ApcaLc {
    /// The signed value, if available.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// The magnitude, if available.
    #[must_use]
    pub fn magnitude(self) -> Option<f64> {
        self.value().map(f64::abs)
    }

    /// Whether a value is available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Optimistic predicate: unavailable cannot disprove a pass.
    #[must_use]
    pub fn passes(self, threshold: f64) -> bool {
        self.magnitude().is_none_or(|lc| lc >= threshold)
    }

    /// Strict predicate: only a measured value can pass.
    #[must_use]
    pub fn verified_pass(self, threshold: f64) -> bool {
        self.magnitude().is_some_and(|lc| lc >= threshold)
    }
}

impl fmt::Display for ApcaLc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) if *v > 0.0 => write!(f, "+{v:.1}"),
            Self::Value(v) => write!(f, "{v:.1}"),
            Self::Unavailable => f.write_str("n/a"),
        }
    }
}

impl Serialize for ApcaLc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

/// Outcome of the APCA check, keeping an unmeasured pass distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApcaVerdict {
    /// Measured and at or above the threshold.
    Pass,
    /// Measured and below the threshold.
    Fail,
    /// APCA unavailable; counted as passing.
    Unverified,
}

impl ApcaVerdict {
    /// Short label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Unverified => "unverified",
        }
    }
}

/// Contrast of one ordered (text, background) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastResult {
    /// WCAG ratio, `>= 1.0`.
    pub ratio: f64,
    /// `ratio >= thresholds.wcag`.
    pub wcag_pass: bool,
    /// Signed Lc of text on background.
    pub lc: ApcaLc,
    /// APCA predicate (true when unavailable).
    pub apca_pass: bool,
    /// Measured, failed, or unverified.
    pub apca_verdict: ApcaVerdict,
}

impl ContrastResult {
    /// Build a result from raw measurements.
    #[must_use]
    pub fn from_measurements(ratio: f64, lc: ApcaLc, thresholds: Thresholds) -> Self {
        let apca_pass = lc.passes(thresholds.apca);
        let apca_verdict = match lc {
            ApcaLc::Unavailable => ApcaVerdict::Unverified,
            ApcaLc::Value(_) if apca_pass => ApcaVerdict::Pass,
            ApcaLc::Value(_) => ApcaVerdict::Fail,
        };
        Self {
            ratio,
            wcag_pass: ratio >= thresholds.wcag,
            lc,
            apca_pass,
            apca_verdict,
        }
    }

    /// Both predicates hold.
    #[must_use]
    pub const fn passes(&self) -> bool {
        self.wcag_pass && self.apca_pass
    }
}

/// Source of APCA Lc values.
///
/// Implementations must be pure: the same pair always yields the same value.
pub trait ApcaProvider: Send + Sync {
    /// Signed Lc of `text` drawn on `background`.
    fn lc(&self, text: Rgb, background: Rgb) -> f64;
}

impl<F> ApcaProvider for F
where
    F: Fn(Rgb, Rgb) -> f64 + Send + Sync,
{
    fn lc(&self, text: Rgb, background: Rgb) -> f64 {
        self(text, background)
    }
}

/// Contrast calculator with an optional APCA provider.
///
/// Cloning is cheap; the provider is shared.
#[derive(Clone)]
pub struct ContrastMetrics {
    apca: Option<Arc<dyn ApcaProvider>>,
}

impl ContrastMetrics {
    /// Metrics backed by the given APCA provider.
    #[must_use]
    pub fn new(provider: impl ApcaProvider + 'static) -> Self {
        Self {
            apca: Some(Arc::new(provider)),
        }
    }

    /// Metrics with APCA unavailable for the lifetime of this value.
    #[must_use]
    pub const fn without_apca() -> Self {
        Self { apca: None }
    }

    /// Metrics backed by the built-in APCA-W3 implementation.
    #[cfg(feature = "apca")]
    #[must_use]
    pub fn apca_w3() -> Self {
        Self::new(crate::apca::ApcaW3)
    }

    /// Whether APCA values can be computed.
    #[must_use]
    pub fn apca_available(&self) -> bool {
        self.apca.is_some()
    }

    /// WCAG ratio (symmetric).
    #[must_use]
    pub fn wcag_ratio(&self, a: Rgb, b: Rgb) -> f64 {
        wcag_ratio(a, b)
    }

    /// APCA Lc of `text` on `background`.
    ///
    /// A provider returning a non-finite number is treated as unavailable
    /// for that pair.
    #[must_use]
    pub fn apca_lc(&self, text: Rgb, background: Rgb) -> ApcaLc {
        match &self.apca {
            Some(provider) => {
                let lc = provider.lc(text, background);
                if lc.is_finite() {
                    ApcaLc::Value(lc)
                } else {
                    ApcaLc::Unavailable
                }
            }
            None => ApcaLc::Unavailable,
        }
    }

    /// Evaluate `text` on `background` against both thresholds.
    #[must_use]
    pub fn contrast(&self, text: Rgb, background: Rgb, thresholds: Thresholds) -> ContrastResult {
        ContrastResult::from_measurements(
            wcag_ratio(text, background),
            self.apca_lc(text, background),
            thresholds,
        )
    }
}

impl fmt::Debug for ContrastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContrastMetrics")
            .field("apca_available", &self.apca_available())
            .finish()
    }
}
