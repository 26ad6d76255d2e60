//! # Greedy Line Breaking
//!
//! First-fit line breaking over a [`MeasuredText`]: accumulate advances
//! until the next break candidate no longer fits, then commit a break at
//! the best position seen so far. On overflow the solver prefers, in order,
//! the last fitting word boundary, the furthest fitting hyphenation point
//! inside the overflowing word, and finally a desperate break at a grapheme
//! cluster boundary. Replacement runs never split; a single atom wider than
//! the line is emitted as an overflow line.
//!
//! The solver is a pure function of its inputs and keeps no state between
//! invocations; one cursor over the candidate stream and one "last
//! breakable" snapshot per line keep it O(n) in the buffer length.

use log::debug;

use crate::font::BoundsRect;
use crate::hyphenator::{EndHyphenEdit, HyphenatorMap, StartHyphenEdit};
use crate::line_layout::{Line, LineBreakResult};
use crate::line_width::{LineWidth, TabStops};
use crate::measured_text::{is_line_end_space, MeasuredText};
use crate::style::LineBreakWordStyle;
use crate::word_breaker::{build_candidates, BreakCandidate, BreakCandidates, CandidateKind};

const CHAR_TAB: u16 = 0x0009;

/// A phrase-mode probe result is kept only while it stays within this many
/// lines; longer paragraphs re-run with grapheme-level breaks.
const PHRASE_LINE_LIMIT: usize = 4;

/// Relative tolerance applied to width comparisons so that float summation
/// order cannot flip a fit decision.
#[inline]
fn width_epsilon(allowed: f32) -> f32 {
    1e-5 * allowed.max(1.0)
}

/// Breaks a measured paragraph into lines using the process-wide hyphenator
/// map.
pub fn break_line_greedy(
    measured: &MeasuredText,
    line_width: &LineWidth,
    tab_stops: &TabStops,
    do_hyphenation: bool,
    use_bounds_for_width: bool,
) -> LineBreakResult {
    break_line_greedy_with(
        HyphenatorMap::global(),
        measured,
        line_width,
        tab_stops,
        do_hyphenation,
        use_bounds_for_width,
    )
}

/// Breaks a measured paragraph into lines with an explicit hyphenator map.
pub fn break_line_greedy_with(
    hyphenators: &HyphenatorMap,
    measured: &MeasuredText,
    line_width: &LineWidth,
    tab_stops: &TabStops,
    do_hyphenation: bool,
    use_bounds_for_width: bool,
) -> LineBreakResult {
    if measured.is_empty() {
        return LineBreakResult::default();
    }
    if measured.has_auto_word_style() {
        // Probe with phrase-granularity breaks first; keep the result only
        // for short paragraphs.
        let probe = solve(
            hyphenators,
            measured,
            line_width,
            tab_stops,
            do_hyphenation,
            use_bounds_for_width,
            LineBreakWordStyle::Phrase,
        );
        if probe.len() <= PHRASE_LINE_LIMIT {
            return probe;
        }
        debug!("phrase probe produced {} lines, re-running without phrase breaks", probe.len());
        return solve(
            hyphenators,
            measured,
            line_width,
            tab_stops,
            do_hyphenation,
            use_bounds_for_width,
            LineBreakWordStyle::None,
        );
    }
    solve(
        hyphenators,
        measured,
        line_width,
        tab_stops,
        do_hyphenation,
        use_bounds_for_width,
        LineBreakWordStyle::None,
    )
}

#[allow(clippy::too_many_arguments)]
fn solve(
    hyphenators: &HyphenatorMap,
    measured: &MeasuredText,
    line_width: &LineWidth,
    tab_stops: &TabStops,
    do_hyphenation: bool,
    use_bounds_for_width: bool,
    auto_word_style: LineBreakWordStyle,
) -> LineBreakResult {
    let mut candidates = build_candidates(measured, do_hyphenation, hyphenators, auto_word_style);
    let mut breaker = GreedyLineBreaker {
        measured,
        line_width,
        tab_stops,
        do_hyphenation,
        use_bounds: use_bounds_for_width,
        lines: Vec::new(),
        line_start: 0,
        start_edit: StartHyphenEdit::NoEdit,
        start_edit_width: 0.0,
        state: LineState::new(0),
        last: None,
    };
    breaker.run(&mut candidates);
    LineBreakResult { lines: breaker.lines }
}

/// Accumulated measurement of the current line from `line_start` through
/// `pos`, with tab advances resolved against the running x.
#[derive(Debug, Clone, Copy)]
struct LineState {
    pos: usize,
    x: f32,
    last_nonspace: Option<usize>,
    x_after_last_nonspace: f32,
    bounds: BoundsRect,
}

impl LineState {
    fn new(start: usize) -> Self {
        LineState {
            pos: start,
            x: 0.0,
            last_nonspace: None,
            x_after_last_nonspace: 0.0,
            bounds: BoundsRect::default(),
        }
    }
}

/// A registered break position with everything needed to emit its line.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    offset: usize,
    width: f32,
    end_edit: EndHyphenEdit,
    next_start_edit: StartHyphenEdit,
    bounds: BoundsRect,
}

fn advance_line_state(
    measured: &MeasuredText,
    tab_stops: &TabStops,
    state: &mut LineState,
    to: usize,
) {
    let text = measured.text();
    let track_bounds = measured.has_bounds();
    while state.pos < to {
        let i = state.pos;
        let pen = state.x;
        if text[i] == CHAR_TAB {
            state.x = tab_stops.next_tab(state.x);
        } else {
            state.x += measured.advance(i);
        }
        if track_bounds {
            state.bounds.join(measured.ink_at(i).offset_x(pen));
        }
        if !is_line_end_space(text[i]) {
            state.last_nonspace = Some(i);
            state.x_after_last_nonspace = state.x;
        }
        state.pos += 1;
    }
}

struct GreedyLineBreaker<'a> {
    measured: &'a MeasuredText,
    line_width: &'a LineWidth,
    tab_stops: &'a TabStops,
    do_hyphenation: bool,
    use_bounds: bool,
    lines: Vec<Line>,
    line_start: usize,
    start_edit: StartHyphenEdit,
    start_edit_width: f32,
    state: LineState,
    last: Option<Snapshot>,
}

impl<'a> GreedyLineBreaker<'a> {
    fn run(&mut self, candidates: &mut BreakCandidates) {
        while let Some(candidate) = candidates.peek().copied() {
            if candidate.kind == CandidateKind::Hyphenation {
                // Hyphenation points are consulted only when a word
                // overflows; they never become the running last-breakable.
                candidates.advance();
                continue;
            }
            self.extend_state(candidate.offset);
            self.process_candidate(&candidate, candidates);
            candidates.advance();
        }
        if let Some(last) = self.last.take() {
            self.push_line(last.offset, last.width, last.end_edit, last.bounds);
        }
    }

    fn process_candidate(&mut self, candidate: &BreakCandidate, candidates: &BreakCandidates) {
        loop {
            let allowed = self.line_width.width_at(self.lines.len());
            let epsilon = width_epsilon(allowed);
            let width = self.width_with_edits(&self.state, candidate.end_edit);
            if self.fits(width, &self.state.bounds, allowed, epsilon) {
                if candidate.offset > self.line_start {
                    self.last = Some(Snapshot {
                        offset: candidate.offset,
                        width,
                        end_edit: candidate.end_edit,
                        next_start_edit: candidate.start_edit,
                        bounds: self.state.bounds,
                    });
                }
                return;
            }

            if let Some(previous) = self.last.take() {
                self.commit(previous, candidate.offset);
                continue;
            }

            if self.do_hyphenation {
                if let Some(snapshot) =
                    self.find_hyphen_break(candidates, candidate.offset, allowed, epsilon)
                {
                    self.commit(snapshot, candidate.offset);
                    continue;
                }
            }

            self.desperate_break(candidate.offset, allowed, epsilon);
            if self.line_start >= candidate.offset {
                return;
            }
        }
    }

    fn fits(&self, width: f32, bounds: &BoundsRect, allowed: f32, epsilon: f32) -> bool {
        if width > allowed + epsilon {
            return false;
        }
        !self.use_bounds || bounds.width() <= allowed + epsilon
    }

    /// Width of the current line up to `state.pos` with trailing line-end
    /// spaces dropped, edge letter spacing trimmed and hyphen edits applied.
    fn width_with_edits(&self, state: &LineState, end_edit: EndHyphenEdit) -> f32 {
        let measured = self.measured;
        let Some(last_nonspace) = state.last_nonspace else {
            return self.start_edit_width;
        };
        let mut width = self.start_edit_width + state.x_after_last_nonspace;
        width -= measured.edge_letter_spacing(self.line_start)
            + measured.edge_letter_spacing(last_nonspace);
        if end_edit.inserts_hyphen() {
            let hyphen = measured
                .style_run_at(last_nonspace)
                .map(|run| run.paint.hyphen_advance())
                .unwrap_or(0.0);
            width += hyphen;
            if end_edit == EndHyphenEdit::ReplaceWithHyphen {
                width -= measured.advance(last_nonspace);
            }
        }
        width
    }

    fn extend_state(&mut self, to: usize) {
        let mut state = self.state;
        advance_line_state(self.measured, self.tab_stops, &mut state, to);
        self.state = state;
    }

    /// Emits the line ending at `snapshot` and re-measures the remainder up
    /// to `resume_to`.
    fn commit(&mut self, snapshot: Snapshot, resume_to: usize) {
        self.push_line(snapshot.offset, snapshot.width, snapshot.end_edit, snapshot.bounds);
        self.begin_line(snapshot.offset, snapshot.next_start_edit);
        self.extend_state(resume_to);
    }

    fn begin_line(&mut self, start: usize, start_edit: StartHyphenEdit) {
        self.line_start = start;
        self.start_edit = start_edit;
        self.start_edit_width = if start_edit.inserts_hyphen() && start < self.measured.len() {
            self.measured
                .style_run_at(start)
                .map(|run| run.paint.hyphen_advance())
                .unwrap_or(0.0)
        } else {
            0.0
        };
        self.state = LineState::new(start);
        self.last = None;
    }

    fn push_line(&mut self, end: usize, width: f32, end_edit: EndHyphenEdit, bounds: BoundsRect) {
        let extent = self.measured.extent(self.line_start..end);
        self.lines.push(Line {
            end_offset: end,
            width,
            start_hyphen: self.start_edit,
            end_hyphen: end_edit,
            ascent: extent.ascent,
            descent: extent.descent,
            bounds: self.measured.has_bounds().then_some(bounds),
        });
    }

    /// Looks for the furthest hyphenation candidate inside the overflowing
    /// word that still fits the line.
    fn find_hyphen_break(
        &self,
        candidates: &BreakCandidates,
        limit: usize,
        allowed: f32,
        epsilon: f32,
    ) -> Option<Snapshot> {
        for candidate in candidates.hyphens_within(self.line_start..limit) {
            let mut state = LineState::new(self.line_start);
            advance_line_state(self.measured, self.tab_stops, &mut state, candidate.offset);
            let width = self.width_with_edits(&state, candidate.end_edit);
            if self.fits(width, &state.bounds, allowed, epsilon) {
                return Some(Snapshot {
                    offset: candidate.offset,
                    width,
                    end_edit: candidate.end_edit,
                    next_start_edit: candidate.start_edit,
                    bounds: state.bounds,
                });
            }
        }
        None
    }

    /// No candidate fits: break at the furthest grapheme cluster boundary
    /// that does, or emit a single overflowing atom as its own line.
    ///
    /// An overflowing replacement run takes this path too. A space following
    /// it then starts the next line and, fitting on its own, later becomes a
    /// zero-width line instead of being absorbed as trailing whitespace.
    /// Arguably that space belongs to the overflow line; layout consumers
    /// rely on the lone space line, so it stays.
    fn desperate_break(&mut self, limit: usize, allowed: f32, epsilon: f32) {
        let measured = self.measured;
        let mut state = LineState::new(self.line_start);
        let mut best: Option<(usize, f32, BoundsRect)> = None;
        let mut first: Option<(usize, f32, BoundsRect)> = None;
        for position in (self.line_start + 1)..=limit {
            advance_line_state(measured, self.tab_stops, &mut state, position);
            if !measured.is_atom_boundary(position) {
                continue;
            }
            let width = self.width_with_edits(&state, EndHyphenEdit::NoEdit);
            if first.is_none() {
                first = Some((position, width, state.bounds));
            }
            if position < limit && self.fits(width, &state.bounds, allowed, epsilon) {
                best = Some((position, width, state.bounds));
            }
        }
        let (end, width, bounds) = match best.or(first) {
            Some(found) => found,
            None => (limit, self.width_with_edits(&state, EndHyphenEdit::NoEdit), state.bounds),
        };
        self.push_line(end, width, EndHyphenEdit::NoEdit, bounds);
        self.begin_line(end, StartHyphenEdit::NoEdit);
        self.extend_state(limit);
    }
}
