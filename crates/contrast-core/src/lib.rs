#![forbid(unsafe_code)]

//! Color contrast checking under WCAG 2.x and APCA, with palette suggestions.
//!
//! The crate is a set of pure functions layered leaf to root:
//!
//! - [`color`]: `Rgb` and `Hsl` values and conversions.
//! - [`metrics`]: WCAG ratio and APCA Lc for an ordered (text, background)
//!   pair. The APCA implementation is injected through [`ApcaProvider`].
//! - [`score`] and [`search`]: the per-role sweep that proposes nearby
//!   colors meeting the thresholds.
//! - [`evaluate`]: the [`Evaluator`] that parses input, measures, suggests
//!   and assembles a [`Report`].
//!
//! # Example
//!
//! ```
//! use contrast_core::{EvaluationRequest, Evaluator};
//!
//! let report = Evaluator::default()
//!     .evaluate(&EvaluationRequest::new("#777777", "#FFFFFF"))
//!     .unwrap();
//! assert!(!report.passed);
//! assert!(report.suggestions.foreground.set().is_some());
//! ```
//!
//! # Features
//!
//! - `apca` (default): the built-in APCA-W3 provider.
//! - `tracing`: debug spans and events from the search and evaluator.

#[cfg(feature = "apca")]
pub mod apca;
pub mod color;
pub mod error;
pub mod evaluate;
pub mod logging;
pub mod metrics;
pub mod parse;
pub mod score;
pub mod search;

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span};

#[cfg(feature = "apca")]
pub use apca::ApcaW3;
pub use color::{Hsl, Rgb};
pub use error::{ColorParseError, ColorRole, EvaluateError, ParseReason};
pub use evaluate::{EvaluationRequest, Evaluator, FocusReport, Report, RoleSuggestions, Suggestions};
pub use metrics::{
    APCA_CONTENT_TEXT, ApcaLc, ApcaProvider, ApcaVerdict, ContrastMetrics, ContrastResult,
    FOCUS_APPEARANCE_RATIO, Thresholds, WCAG_AA, WCAG_AA_LARGE, WCAG_AAA, format_ratio,
    relative_luminance, wcag_ratio,
};
pub use parse::{ColorParser, CssColorParser, parse_css_color};
pub use search::{Candidate, SearchConfig, SuggestionSet, SuggestionTier};
