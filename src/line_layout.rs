//! # Line Break Results
//!
//! Flat per-line records produced by the solver. Offsets partition the
//! paragraph buffer: line `i` covers `[lines[i-1].end_offset,
//! lines[i].end_offset)`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::font::{BoundsRect, FontExtent};
use crate::hyphenator::{EndHyphenEdit, StartHyphenEdit};

/// One laid-out line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Exclusive end of the line's text, in code units.
    pub end_offset: usize,
    /// Advance width excluding trailing line-end spaces, including hyphen
    /// edits.
    pub width: f32,
    /// Edit applied at the start of this line.
    pub start_hyphen: StartHyphenEdit,
    /// Edit applied at the end of this line.
    pub end_hyphen: EndHyphenEdit,
    /// Minimum ascent over the line's content (zero or negative).
    pub ascent: f32,
    /// Maximum descent over the line's content (zero or positive).
    pub descent: f32,
    /// Ink bounds of the line, present when bounds were computed.
    pub bounds: Option<BoundsRect>,
}

/// The ordered sequence of lines for one paragraph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineBreakResult {
    pub lines: Vec<Line>,
}

impl LineBreakResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Code-unit range of line `index`.
    pub fn line_range(&self, index: usize) -> Range<usize> {
        let start = if index == 0 { 0 } else { self.lines[index - 1].end_offset };
        start..self.lines[index].end_offset
    }

    /// Combined extent over all lines.
    pub fn extent(&self) -> FontExtent {
        let mut extent = FontExtent::default();
        for line in &self.lines {
            extent.extend_by(FontExtent::new(line.ascent, line.descent));
        }
        extent
    }
}
