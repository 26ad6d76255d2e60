//! # Style Parameters
//!
//! Per-run styling consumed by the measurement and line-break stages: the
//! paint (font, size, spacing, locale) and the script-level break policies.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::font::Font;

/// Strictness of script line-break rules, mirroring the CSS `line-break`
/// property. `None` applies the untailored UAX #14 rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineBreakStyle {
    #[default]
    None,
    Loose,
    Normal,
    Strict,
}

/// Granularity of break opportunities inside CJK text.
///
/// `Phrase` restricts breaks to phrase boundaries (bunsetsu-style segments
/// for Japanese, spaces for Korean). `Auto` behaves like `Phrase` for short
/// paragraphs and falls back to `None` when the phrase layout would need
/// five or more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineBreakWordStyle {
    #[default]
    None,
    Phrase,
    Auto,
}

/// Paint parameters of a style run.
///
/// `letter_spacing` is in ems of `size`; every glyph advance grows by one
/// full increment and the half-increments hanging off both line edges are
/// trimmed from reported line widths. `scale_x` multiplies glyph advances
/// only, not letter spacing.
#[derive(Debug, Clone)]
pub struct Paint {
    pub font: Arc<dyn Font>,
    pub size: f32,
    pub letter_spacing: f32,
    pub scale_x: f32,
    pub locale_list_id: u32,
}

impl Paint {
    pub fn new(font: Arc<dyn Font>) -> Self {
        Paint { font, size: 12.0, letter_spacing: 0.0, scale_x: 1.0, locale_list_id: 0 }
    }

    #[inline]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[inline]
    pub fn with_letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    #[inline]
    pub fn with_scale_x(mut self, scale_x: f32) -> Self {
        self.scale_x = scale_x;
        self
    }

    #[inline]
    pub fn with_locale_list_id(mut self, id: u32) -> Self {
        self.locale_list_id = id;
        self
    }

    /// Letter spacing in pixels.
    #[inline]
    pub(crate) fn letter_spacing_px(&self) -> f32 {
        self.letter_spacing * self.size
    }

    /// Advance of the hyphen glyph in this paint.
    #[inline]
    pub(crate) fn hyphen_advance(&self) -> f32 {
        self.font.hyphen_advance(self.size) * self.scale_x
    }
}
