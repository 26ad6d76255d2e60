//! # CJK Phrase Segmentation
//!
//! Character classes and boundary rules backing the phrase-style break
//! policies. Japanese phrases are approximated bunsetsu-style from script
//! transitions: a phrase starts at an ideograph or katakana run and absorbs
//! the hiragana (particles, okurigana) and punctuation that follow it.
//! Korean phrases are eojeol, delimited by spaces.

use crate::utf16;

/// CJK unified ideographs, including the extension planes.
pub fn is_ideograph(code_point: u32) -> bool {
    (0x4E00..=0x9FFF).contains(&code_point)
        || (0x3400..=0x4DBF).contains(&code_point)
        || (0x20000..=0x2A6DF).contains(&code_point)
        || (0x2A700..=0x2EBEF).contains(&code_point)
        || (0xF900..=0xFAFF).contains(&code_point)
}

pub fn is_hiragana(code_point: u32) -> bool {
    (0x3041..=0x309F).contains(&code_point)
}

pub fn is_katakana(code_point: u32) -> bool {
    (0x30A1..=0x30FF).contains(&code_point) || (0x31F0..=0x31FF).contains(&code_point)
}

/// CJK punctuation that attaches to the preceding phrase.
pub fn is_cjk_punctuation(code_point: u32) -> bool {
    (0x3000..=0x303F).contains(&code_point)
        || (0xFF01..=0xFF0F).contains(&code_point)
        || (0xFF1A..=0xFF1F).contains(&code_point)
        || (0xFF3B..=0xFF40).contains(&code_point)
        || (0xFF5B..=0xFF65).contains(&code_point)
        || matches!(code_point, 0x2018 | 0x2019 | 0x201C | 0x201D | 0x2026 | 0x2030)
}

/// Characters that `LineBreakStyle::Normal` allows a break before even
/// though strict rules treat them as non-starters: small kana and the
/// prolonged sound mark.
pub fn is_conditional_starter(code_point: u32) -> bool {
    matches!(code_point,
        // Small hiragana.
        0x3041 | 0x3043 | 0x3045 | 0x3047 | 0x3049
        | 0x3063 | 0x3083 | 0x3085 | 0x3087 | 0x308E | 0x3095 | 0x3096
        // Small katakana.
        | 0x30A1 | 0x30A3 | 0x30A5 | 0x30A7 | 0x30A9
        | 0x30C3 | 0x30E3 | 0x30E5 | 0x30E7 | 0x30EE | 0x30F5 | 0x30F6
        | 0x31F0..=0x31FF
        // Prolonged sound mark.
        | 0x30FC)
}

/// Additional starters `LineBreakStyle::Loose` unlocks: iteration marks and
/// centered punctuation.
pub fn is_loose_starter(code_point: u32) -> bool {
    matches!(code_point, 0x3005 | 0x303B | 0x309D | 0x309E | 0x30FD | 0x30FE | 0x30FB | 0xFF65)
}

/// True when a phrase-mode break is acceptable at `offset` in Japanese (or
/// other han-based) text.
///
/// Boundaries open before an ideograph or katakana character that follows
/// hiragana, and after CJK punctuation.
pub fn is_japanese_phrase_boundary(units: &[u16], offset: usize) -> bool {
    if offset == 0 || offset >= units.len() {
        return true;
    }
    let (prev, _) = utf16::code_point_before(units, offset);
    let (next, _) = utf16::code_point_at(units, offset);
    if is_cjk_punctuation(prev) && !is_cjk_punctuation(next) {
        return true;
    }
    is_hiragana(prev) && (is_ideograph(next) || is_katakana(next))
}

/// True when a phrase-mode break is acceptable at `offset` in Korean text:
/// only after a space (eojeol boundary).
pub fn is_korean_phrase_boundary(units: &[u16], offset: usize) -> bool {
    if offset == 0 || offset >= units.len() {
        return true;
    }
    units[offset - 1] == 0x0020
}
