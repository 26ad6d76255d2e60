//! # Break Opportunity Enumeration
//!
//! Produces the ordered candidate stream the solver consumes. Candidates
//! come from several authorities, merged with fixed precedence:
//!
//! 1. UAX #14 break opportunities over the whole paragraph, tailored by the
//!    run's line-break style and word style (phrase filtering for CJK);
//! 2. replacement runs, which suppress every candidate strictly inside
//!    their range;
//! 3. email addresses and URLs, which admit no interior break;
//! 4. per-word hyphenation points carrying their hyphen edits, inserted
//!    where the word-break rules delimit a word and the locale's hyphenator
//!    supplies a break.
//!
//! The stream is exposed as a restartable cursor with `peek`/`advance` so
//! the solver can look ahead without consuming.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::hyphenator::{EndHyphenEdit, HyphenationType, HyphenatorMap, StartHyphenEdit};
use crate::locale::LocaleListCache;
use crate::measured_text::{MeasuredText, Run};
use crate::phrase;
use crate::style::{LineBreakStyle, LineBreakWordStyle};
use crate::utf16;

/// What produced a candidate; hyphenation candidates are only consulted
/// when a word overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    Word,
    Hyphenation,
}

/// A position at which the paragraph may break, with the hyphen edits to
/// apply when it is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakCandidate {
    pub offset: usize,
    pub kind: CandidateKind,
    /// Edit for the line that would end at `offset`.
    pub end_edit: EndHyphenEdit,
    /// Edit for the line that would start at `offset`.
    pub start_edit: StartHyphenEdit,
}

/// The merged candidate stream in strictly increasing offset order.
#[derive(Debug, Clone)]
pub struct BreakCandidates {
    list: Vec<BreakCandidate>,
    cursor: usize,
}

impl BreakCandidates {
    /// The next unconsumed candidate.
    #[inline]
    pub fn peek(&self) -> Option<&BreakCandidate> {
        self.list.get(self.cursor)
    }

    /// Consumes the current candidate.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Rewinds the cursor to the first candidate.
    #[inline]
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[BreakCandidate] {
        &self.list
    }

    /// Hyphenation candidates strictly inside `range`, furthest first.
    pub(crate) fn hyphens_within(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = &BreakCandidate> {
        let hi = self.list.partition_point(|c| c.offset < range.end);
        let lo = self.list.partition_point(|c| c.offset <= range.start);
        self.list[lo..hi]
            .iter()
            .rev()
            .filter(|c| c.kind == CandidateKind::Hyphenation)
    }
}

/// Enumerates the break candidates of `measured`.
///
/// `auto_word_style` tells the enumerator what `LineBreakWordStyle::Auto`
/// resolves to for this pass (the solver probes `Phrase` first and may
/// re-run with `None`).
pub fn build_candidates(
    measured: &MeasuredText,
    do_hyphenation: bool,
    hyphenators: &HyphenatorMap,
    auto_word_style: LineBreakWordStyle,
) -> BreakCandidates {
    if measured.is_empty() {
        return BreakCandidates { list: Vec::new(), cursor: 0 };
    }

    let text = measured.text();
    let utf8 = measured.utf8();
    let protected = protected_spans(measured);

    // UAX #14 opportunities, translated to code-unit offsets.
    let mut word_offsets: BTreeSet<usize> = BTreeSet::new();
    for (byte, _) in unicode_linebreak::linebreaks(&utf8.text) {
        let offset = utf8.byte_to_unit[byte];
        if offset > 0 {
            word_offsets.insert(offset);
        }
    }

    add_tailored_offsets(measured, &mut word_offsets);

    let len = text.len();
    word_offsets.retain(|&offset| {
        offset == len
            || (!measured.is_replacement_interior(offset)
                && !is_protected_interior(&protected, offset)
                && keeps_phrase_policy(measured, offset, auto_word_style))
    });

    let mut merged: BTreeMap<usize, BreakCandidate> = word_offsets
        .iter()
        .map(|&offset| {
            (offset, BreakCandidate {
                offset,
                kind: CandidateKind::Word,
                end_edit: EndHyphenEdit::NoEdit,
                start_edit: StartHyphenEdit::NoEdit,
            })
        })
        .collect();

    if do_hyphenation {
        add_hyphenation_candidates(measured, hyphenators, &protected, &mut merged);
    }

    BreakCandidates { list: merged.into_values().collect(), cursor: 0 }
}

/// Unit ranges of tokens that must not break internally (emails, URLs).
fn protected_spans(measured: &MeasuredText) -> Vec<Range<usize>> {
    let utf8 = measured.utf8();
    let mut spans = Vec::new();
    let mut token_start: Option<usize> = None;
    let bytes = utf8.text.len();
    for (byte, ch) in utf8.text.char_indices().chain(std::iter::once((bytes, ' '))) {
        if ch.is_whitespace() {
            if let Some(start) = token_start.take() {
                let token = &utf8.text[start..byte];
                if is_email_or_url(token) {
                    spans.push(utf8.byte_to_unit[start]..utf8.byte_to_unit[byte]);
                }
            }
        } else if token_start.is_none() {
            token_start = Some(byte);
        }
    }
    spans
}

fn is_email_or_url(token: &str) -> bool {
    if let Some(pos) = token.find("://") {
        if token[..pos].chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) {
            return true;
        }
    }
    match token.find('@') {
        Some(pos) => pos > 0 && pos + 1 < token.len(),
        None => false,
    }
}

fn is_protected_interior(spans: &[Range<usize>], offset: usize) -> bool {
    spans.iter().any(|span| offset > span.start && offset < span.end)
}

fn span_overlaps(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans.iter().any(|span| span.start < range.end && range.start < span.end)
}

/// Extra opportunities unlocked by `Normal` and `Loose` line-break styles:
/// breaks before conditional Japanese starters that strict rules keep
/// glued to the previous character.
fn add_tailored_offsets(measured: &MeasuredText, word_offsets: &mut BTreeSet<usize>) {
    let text = measured.text();
    let mut i = 0;
    while i < text.len() {
        let (cp, cp_len) = utf16::code_point_at(text, i);
        let offset = i;
        i += cp_len;
        if offset == 0 || !measured.is_grapheme_boundary(offset) {
            continue;
        }
        let style = match measured.style_run_at(offset - 1) {
            Some(run) => run.line_break_style,
            None => continue,
        };
        if !matches!(style, LineBreakStyle::Normal | LineBreakStyle::Loose) {
            continue;
        }
        let (prev, _) = utf16::code_point_before(text, offset);
        let prev_is_cjk = phrase::is_ideograph(prev)
            || phrase::is_hiragana(prev)
            || phrase::is_katakana(prev)
            || phrase::is_conditional_starter(prev);
        if !prev_is_cjk {
            continue;
        }
        if phrase::is_conditional_starter(cp)
            || (style == LineBreakStyle::Loose && phrase::is_loose_starter(cp))
        {
            word_offsets.insert(offset);
        }
    }
}

/// Applies the per-run word-style policy to a word offset.
fn keeps_phrase_policy(
    measured: &MeasuredText,
    offset: usize,
    auto_word_style: LineBreakWordStyle,
) -> bool {
    let run = match measured.style_run_at(offset - 1) {
        Some(run) => run,
        // Replacement edges stay breakable.
        None => return true,
    };
    let style = match run.word_style {
        LineBreakWordStyle::Auto => auto_word_style,
        other => other,
    };
    if style != LineBreakWordStyle::Phrase {
        return true;
    }
    let locales = LocaleListCache::get(run.paint.locale_list_id);
    match locales.primary().map(|l| l.language()) {
        Some("ja") | Some("zh") => phrase::is_japanese_phrase_boundary(measured.text(), offset),
        Some("ko") => phrase::is_korean_phrase_boundary(measured.text(), offset),
        _ => true,
    }
}

/// Adds in-word hyphenation candidates for every whitespace-delimited
/// token, trimmed to its hyphenatable content. Tokens are not split at
/// script break opportunities: an explicit hyphen inside a compound still
/// belongs to the word its hyphenator inspects.
fn add_hyphenation_candidates(
    measured: &MeasuredText,
    hyphenators: &HyphenatorMap,
    protected: &[Range<usize>],
    merged: &mut BTreeMap<usize, BreakCandidate>,
) {
    let text = measured.text();
    for token in tokens(text) {
        if span_overlaps(protected, &token) {
            continue;
        }
        let Some(word) = trim_to_word(text, token) else { continue };
        if word.end - word.start < 2 {
            continue;
        }
        if !hyphenation_allowed_over(measured, &word) {
            continue;
        }
        let Some(style_run) = measured.style_run_at(word.start) else { continue };
        let locales = LocaleListCache::get(style_run.paint.locale_list_id);
        let Some(hyphenator) = hyphenators.lookup(&locales) else {
            log::trace!("no hyphenator for word at {}..{}", word.start, word.end);
            continue;
        };

        let types = hyphenator.hyphenate(&text[word.clone()]);
        for (k, hyphenation) in types.iter().enumerate().skip(1) {
            if *hyphenation == HyphenationType::DontBreak {
                continue;
            }
            let offset = word.start + k;
            if !measured.is_grapheme_boundary(offset) || measured.is_replacement_interior(offset) {
                continue;
            }
            merged
                .entry(offset)
                .and_modify(|candidate| {
                    // A word boundary coinciding with a hyphenation point
                    // takes over its edits (Polish repeated hyphens, soft
                    // hyphens at existing opportunities).
                    candidate.end_edit = hyphenation.end_edit();
                    candidate.start_edit = hyphenation.start_edit();
                })
                .or_insert_with(|| BreakCandidate {
                    offset,
                    kind: CandidateKind::Hyphenation,
                    end_edit: hyphenation.end_edit(),
                    start_edit: hyphenation.start_edit(),
                });
        }
    }
}

/// Maximal runs of non-whitespace code units.
fn tokens(text: &[u16]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut i = 0;
    while i < text.len() {
        let (cp, cp_len) = utf16::code_point_at(text, i);
        let whitespace = char::from_u32(cp).map(|c| c.is_whitespace()).unwrap_or(false);
        if whitespace {
            if let Some(s) = start.take() {
                out.push(s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
        i += cp_len;
    }
    if let Some(s) = start {
        out.push(s..text.len());
    }
    out
}

/// Shrinks a segment to the word content usable for hyphenation.
fn trim_to_word(text: &[u16], segment: Range<usize>) -> Option<Range<usize>> {
    let mut start = segment.start;
    let mut end = segment.end;
    while start < end {
        let (cp, cp_len) = utf16::code_point_at(text, start);
        if is_word_part(cp) {
            break;
        }
        start += cp_len;
    }
    while end > start {
        let (cp, first) = utf16::code_point_before(text, end);
        if is_word_part(cp) {
            break;
        }
        end = first;
    }
    (start < end).then_some(start..end)
}

/// Characters that belong to a hyphenatable word: letters plus the hyphen
/// family, soft hyphens, the Catalan middle dot and apostrophes.
fn is_word_part(code_point: u32) -> bool {
    if char::from_u32(code_point).map(|c| c.is_alphabetic()).unwrap_or(false) {
        return true;
    }
    matches!(code_point,
        0x0027 | 0x00AD | 0x00B7 | 0x002D | 0x058A | 0x05BE | 0x1400 | 0x2010 | 0x2013 | 0x2019
        | 0x2027 | 0x2E17 | 0x2E40)
}

/// Every style run covering `range` must allow hyphenation, and no
/// replacement content may intrude.
fn hyphenation_allowed_over(measured: &MeasuredText, range: &Range<usize>) -> bool {
    measured.runs().iter().all(|run| {
        let run_range = run.range();
        if run_range.start >= range.end || range.start >= run_range.end {
            return true;
        }
        match run {
            Run::Style(style) => style.hyphenation_allowed,
            Run::Replacement(_) => false,
        }
    })
}
