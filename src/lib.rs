//! # Linefold Core
//!
//! Greedy line breaking for measured, multi-script text. The caller shapes
//! and measures a paragraph into a [`MeasuredText`], then asks
//! [`break_line_greedy`] for line breaks that honor script break rules,
//! hyphenation, replacement spans, tab stops, letter spacing and
//! bounds-aware fitting.

pub mod font;
pub mod hyphenator;
pub mod line_breaking;
pub mod line_layout;
pub mod line_width;
pub mod locale;
pub mod measured_text;
pub mod phrase;
pub mod style;
pub mod text_shaping;
pub mod word_breaker;

mod utf16;

pub use font::{is_default_ignorable, BoundsRect, Font, FontExtent};
pub use hyphenator::{
    EndHyphenEdit, HyphenationType, Hyphenator, HyphenatorMap, StartHyphenEdit,
};
pub use line_breaking::{break_line_greedy, break_line_greedy_with};
pub use line_layout::{Line, LineBreakResult};
pub use line_width::{LineWidth, TabStops};
pub use locale::{Locale, LocaleList, LocaleListCache};
pub use measured_text::{
    is_line_end_space, MeasuredText, MeasuredTextBuilder, MeasuredTextError, ReplacementRun, Run,
    StyleRun,
};
pub use style::{LineBreakStyle, LineBreakWordStyle, Paint};
pub use text_shaping::ShapedFont;
pub use word_breaker::{build_candidates, BreakCandidate, BreakCandidates, CandidateKind};
