//! # Measured Text
//!
//! [`MeasuredText`] is the immutable, indexed record the solver reads:
//! per-code-unit advances, the owning run for every offset, per-code-point
//! vertical extents, grapheme cluster boundaries, and (in bounds mode) ink
//! rectangles. It is built once per paragraph from style and replacement
//! runs; construction validates that the runs tile the buffer exactly.

use std::ops::Range;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::font::{BoundsRect, FontExtent};
use crate::style::{LineBreakStyle, LineBreakWordStyle, Paint};
use crate::utf16::{self, Utf8View};

/// A run of uniformly styled text.
#[derive(Debug, Clone)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub paint: Paint,
    pub line_break_style: LineBreakStyle,
    pub word_style: LineBreakWordStyle,
    pub hyphenation_allowed: bool,
    pub ignore_kerning: bool,
}

/// An atomic run whose advance is supplied by the caller; its interior
/// offers no break opportunity and contributes no extent.
#[derive(Debug, Clone)]
pub struct ReplacementRun {
    pub range: Range<usize>,
    pub advance: f32,
    pub locale_list_id: u32,
}

/// One run of the paragraph. The variant set is closed, so dispatch stays
/// static.
#[derive(Debug, Clone)]
pub enum Run {
    Style(StyleRun),
    Replacement(ReplacementRun),
}

impl Run {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        match self {
            Run::Style(run) => run.range.clone(),
            Run::Replacement(run) => run.range.clone(),
        }
    }

    #[inline]
    pub fn is_replacement(&self) -> bool {
        matches!(self, Run::Replacement(_))
    }
}

/// Errors detected while building a [`MeasuredText`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasuredTextError {
    #[error("run range {start}..{end} is invalid for a buffer of {len} code units")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("run starting at {found} overlaps or leaves a gap at {expected}")]
    BrokenCoverage { expected: usize, found: usize },
    #[error("runs cover only {covered} of {len} code units")]
    IncompleteCoverage { covered: usize, len: usize },
}

/// Accumulates runs, then measures the paragraph.
#[derive(Debug, Default)]
pub struct MeasuredTextBuilder {
    runs: Vec<Run>,
}

impl MeasuredTextBuilder {
    pub fn new() -> Self {
        MeasuredTextBuilder::default()
    }

    /// Appends a style run covering `start..end`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_style_run(
        &mut self,
        start: usize,
        end: usize,
        paint: Paint,
        line_break_style: LineBreakStyle,
        word_style: LineBreakWordStyle,
        hyphenation_allowed: bool,
        ignore_kerning: bool,
    ) -> &mut Self {
        self.runs.push(Run::Style(StyleRun {
            range: start..end,
            paint,
            line_break_style,
            word_style,
            hyphenation_allowed,
            ignore_kerning,
        }));
        self
    }

    /// Appends a replacement run covering `start..end` with an explicit
    /// total advance.
    pub fn add_replacement_run(
        &mut self,
        start: usize,
        end: usize,
        advance: f32,
        locale_list_id: u32,
    ) -> &mut Self {
        self.runs.push(Run::Replacement(ReplacementRun { range: start..end, advance, locale_list_id }));
        self
    }

    /// Measures `text` against the accumulated runs.
    ///
    /// `compute_bounds` records per-glyph ink boxes for bounds-aware
    /// fitting; `ignore_kerning` disables pair adjustments in shaping
    /// regardless of the per-run flag.
    pub fn build(
        self,
        text: &[u16],
        compute_bounds: bool,
        ignore_kerning: bool,
    ) -> Result<MeasuredText, MeasuredTextError> {
        let len = text.len();
        let mut expected = 0;
        for run in &self.runs {
            let range = run.range();
            if range.start >= range.end || range.end > len {
                return Err(MeasuredTextError::InvalidRange {
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
            if range.start != expected {
                return Err(MeasuredTextError::BrokenCoverage { expected, found: range.start });
            }
            expected = range.end;
        }
        if expected != len {
            return Err(MeasuredTextError::IncompleteCoverage { covered: expected, len });
        }

        log::debug!("measuring paragraph: {} code units, {} runs", len, self.runs.len());

        let mut advances = vec![0.0f32; len];
        let mut extents = vec![FontExtent::default(); len];
        let mut run_index = vec![0u32; len];
        let mut ink = if compute_bounds { Some(vec![BoundsRect::default(); len]) } else { None };

        for (index, run) in self.runs.iter().enumerate() {
            let range = run.range();
            for i in range.clone() {
                run_index[i] = index as u32;
            }
            match run {
                Run::Replacement(replacement) => {
                    advances[range.start] = replacement.advance;
                }
                Run::Style(style) => {
                    let paint = &style.paint;
                    let spacing = paint.letter_spacing_px();
                    let shaped = paint.font.shape_run(
                        &text[range.clone()],
                        paint.size,
                        ignore_kerning || style.ignore_kerning,
                    );
                    for (offset, advance) in shaped.iter().enumerate() {
                        if *advance > 0.0 {
                            advances[range.start + offset] = advance * paint.scale_x + spacing;
                        }
                    }
                    let mut i = range.start;
                    while i < range.end {
                        let (cp, cp_len) = utf16::code_point_at(text, i);
                        let extent = paint.font.extent(cp, paint.size);
                        for unit in i..(i + cp_len).min(range.end) {
                            extents[unit] = extent;
                        }
                        if let Some(ink) = ink.as_mut() {
                            ink[i] = paint.font.glyph_bounds(cp, paint.size);
                        }
                        i += cp_len;
                    }
                }
            }
        }

        let utf8 = Utf8View::new(text);
        let mut grapheme_starts = vec![false; len + 1];
        for (byte, _) in utf8.text.grapheme_indices(true) {
            grapheme_starts[utf8.byte_to_unit[byte]] = true;
        }
        grapheme_starts[0] = true;
        grapheme_starts[len] = true;

        Ok(MeasuredText {
            text: text.to_vec(),
            advances,
            extents,
            runs: self.runs,
            run_index,
            grapheme_starts,
            ink,
            utf8,
        })
    }
}

/// The measured paragraph, read-only for the solver.
#[derive(Debug)]
pub struct MeasuredText {
    text: Vec<u16>,
    advances: Vec<f32>,
    extents: Vec<FontExtent>,
    runs: Vec<Run>,
    run_index: Vec<u32>,
    grapheme_starts: Vec<bool>,
    ink: Option<Vec<BoundsRect>>,
    utf8: Utf8View,
}

impl MeasuredText {
    #[inline]
    pub fn text(&self) -> &[u16] {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Advance contributed by code unit `i`.
    #[inline]
    pub fn advance(&self, i: usize) -> f32 {
        self.advances[i]
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// The run owning code unit `i`.
    #[inline]
    pub fn run_at(&self, i: usize) -> &Run {
        &self.runs[self.run_index[i] as usize]
    }

    /// The style run owning code unit `i`, if it is not replacement content.
    pub fn style_run_at(&self, i: usize) -> Option<&StyleRun> {
        match self.run_at(i) {
            Run::Style(run) => Some(run),
            Run::Replacement(_) => None,
        }
    }

    /// True when `i` lies inside a replacement run but is not its first
    /// unit.
    pub fn is_replacement_interior(&self, i: usize) -> bool {
        match self.run_at(i) {
            Run::Replacement(run) => i != run.range.start,
            Run::Style(_) => false,
        }
    }

    /// True at grapheme cluster starts (and at both buffer ends).
    #[inline]
    pub fn is_grapheme_boundary(&self, i: usize) -> bool {
        self.grapheme_starts[i]
    }

    /// Boundaries where a desperate break may occur: grapheme cluster
    /// starts outside replacement interiors.
    #[inline]
    pub(crate) fn is_atom_boundary(&self, i: usize) -> bool {
        self.grapheme_starts[i] && (i == self.len() || !self.is_replacement_interior(i))
    }

    /// True when bounds were computed at build time.
    #[inline]
    pub fn has_bounds(&self) -> bool {
        self.ink.is_some()
    }

    /// Ink box of the glyph starting at unit `i`, relative to its pen.
    #[inline]
    pub(crate) fn ink_at(&self, i: usize) -> BoundsRect {
        self.ink.as_ref().map(|ink| ink[i]).unwrap_or_default()
    }

    /// Minimum ascent and maximum descent over the non-replacement content
    /// of `range`; (0, 0) when the range holds only replacement content.
    pub fn extent(&self, range: Range<usize>) -> FontExtent {
        let mut extent = FontExtent::default();
        for i in range {
            extent.extend_by(self.extents[i]);
        }
        extent
    }

    /// Union of the ink boxes in `range`, positioned from the pen at
    /// `range.start`. Tab advances are taken as measured.
    pub fn ink_bounds(&self, range: Range<usize>) -> BoundsRect {
        let mut bounds = BoundsRect::default();
        let mut pen = 0.0;
        for i in range {
            bounds.join(self.ink_at(i).offset_x(pen));
            pen += self.advances[i];
        }
        bounds
    }

    /// Width of `start..end` as a line: trailing line-end spaces contribute
    /// nothing, and the letter-spacing halves hanging off both edges are
    /// trimmed. Tab advances are taken as measured, so this matches the
    /// solver only for tab-free lines.
    pub fn line_width(&self, start: usize, end: usize) -> f32 {
        let mut trimmed = end;
        while trimmed > start && is_line_end_space(self.text[trimmed - 1]) {
            trimmed -= 1;
        }
        if trimmed == start {
            return 0.0;
        }
        let mut width: f32 = self.advances[start..trimmed].iter().sum();
        width -= self.edge_letter_spacing(start) + self.edge_letter_spacing(trimmed - 1);
        width
    }

    /// Half a letter-spacing increment of the run owning unit `i`.
    #[inline]
    pub(crate) fn edge_letter_spacing(&self, i: usize) -> f32 {
        self.style_run_at(i).map(|run| run.paint.letter_spacing_px() * 0.5).unwrap_or(0.0)
    }

    /// True when any run asks for the `Auto` word style, which requires the
    /// phrase probe pass.
    pub(crate) fn has_auto_word_style(&self) -> bool {
        self.runs.iter().any(|run| {
            matches!(run, Run::Style(style) if style.word_style == LineBreakWordStyle::Auto)
        })
    }

    #[inline]
    pub(crate) fn utf8(&self) -> &Utf8View {
        &self.utf8
    }
}

/// Whitespace that, at the end of a line, stays in the line's text but
/// contributes nothing to its width: space, tab and the breakable
/// space-separator block.
pub fn is_line_end_space(unit: u16) -> bool {
    matches!(unit,
        0x0009 | 0x0020 | 0x1680 | 0x2000..=0x2006 | 0x2008..=0x200A | 0x205F | 0x3000)
}
