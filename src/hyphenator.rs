//! # Hyphenation
//!
//! Hyphenation runs in two steps: collect candidate break points inside a
//! word (Knuth–Liang patterns, an exception word list, or rule-based
//! fallback for words the patterns cannot map), then resolve each point to a
//! [`HyphenationType`] describing the edits both adjacent lines need. The
//! edit depends on script and locale: Polish and Slovenian repeat an
//! explicit hyphen on the continuation line, Catalan "l·l" collapses to
//! "l-" / "l", Armenian and Canadian Aboriginal scripts use their own
//! hyphen glyphs, and several Indic scripts break without any glyph.
//!
//! [`HyphenatorMap`] is the per-locale registry. Hosts own one explicitly or
//! rely on the lazily initialized process-wide instance; lookups are
//! read-locked and cheap, mutation is expected during startup only.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use hyphenation::Hyphenator as _;
use hyphenation::{Language, Load, Standard};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use unicode_script::{Script, UnicodeScript};

use crate::locale::LocaleList;
use crate::utf16;

const CHAR_SOFT_HYPHEN: u16 = 0x00AD;
const CHAR_MIDDLE_DOT: u16 = 0x00B7;
const CHAR_HYPHEN_MINUS: u16 = 0x002D;
const CHAR_HYPHEN: u16 = 0x2010;

/// Words longer than this are never hyphenated.
const MAX_WORD_LEN: usize = 64;

/// Edit applied to the start of the line following a hyphenation break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartHyphenEdit {
    #[default]
    NoEdit,
    InsertHyphen,
    InsertZwj,
}

impl StartHyphenEdit {
    /// True when the edit inserts a visible hyphen glyph.
    #[inline]
    pub fn inserts_hyphen(self) -> bool {
        self == StartHyphenEdit::InsertHyphen
    }
}

/// Edit applied to the end of the line broken by hyphenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndHyphenEdit {
    #[default]
    NoEdit,
    InsertHyphen,
    InsertArmenianHyphen,
    InsertUcasHyphen,
    InsertZwjAndHyphen,
    ReplaceWithHyphen,
}

impl EndHyphenEdit {
    /// True when the edit puts a hyphen-like glyph at the end of the line,
    /// which widens the line by one hyphen advance.
    #[inline]
    pub fn inserts_hyphen(self) -> bool {
        self != EndHyphenEdit::NoEdit
    }
}

/// How a particular in-word position may break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HyphenationType {
    /// Not a break point.
    DontBreak,
    /// Break and insert a normal hyphen.
    BreakAndInsertHyphen,
    /// Break and insert an Armenian hyphen (U+058A).
    BreakAndInsertArmenianHyphen,
    /// Break and insert a Canadian Syllabics hyphen (U+1400).
    BreakAndInsertUcasHyphen,
    /// Break without inserting anything; used after explicit hyphens and for
    /// scripts that do not hyphenate visibly.
    BreakAndDontInsertHyphen,
    /// Break and replace the preceding code unit with a hyphen (Catalan
    /// "l·l" becomes "l-" / "l").
    BreakAndReplaceWithHyphen,
    /// Break and repeat the hyphen at the start of the next line (Polish and
    /// Slovenian compounds).
    BreakAndInsertHyphenAtNextLine,
    /// Break with a ZWJ-preserving hyphen, keeping Arabic joining forms.
    BreakAndInsertHyphenAndZwj,
}

impl HyphenationType {
    /// The edit this break applies to the line it ends.
    pub fn end_edit(self) -> EndHyphenEdit {
        match self {
            HyphenationType::BreakAndInsertHyphen => EndHyphenEdit::InsertHyphen,
            HyphenationType::BreakAndInsertArmenianHyphen => EndHyphenEdit::InsertArmenianHyphen,
            HyphenationType::BreakAndInsertUcasHyphen => EndHyphenEdit::InsertUcasHyphen,
            HyphenationType::BreakAndReplaceWithHyphen => EndHyphenEdit::ReplaceWithHyphen,
            HyphenationType::BreakAndInsertHyphenAndZwj => EndHyphenEdit::InsertZwjAndHyphen,
            _ => EndHyphenEdit::NoEdit,
        }
    }

    /// The edit this break applies to the line it starts.
    pub fn start_edit(self) -> StartHyphenEdit {
        match self {
            HyphenationType::BreakAndInsertHyphenAtNextLine => StartHyphenEdit::InsertHyphen,
            HyphenationType::BreakAndInsertHyphenAndZwj => StartHyphenEdit::InsertZwj,
            _ => StartHyphenEdit::NoEdit,
        }
    }
}

/// Locales whose hyphenation rules differ beyond patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HyphenationLocale {
    Other,
    Catalan,
    Polish,
    Slovenian,
    Portuguese,
}

impl HyphenationLocale {
    fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or(tag);
        match language.to_ascii_lowercase().as_str() {
            "ca" => HyphenationLocale::Catalan,
            "pl" => HyphenationLocale::Polish,
            "sl" => HyphenationLocale::Slovenian,
            "pt" => HyphenationLocale::Portuguese,
            _ => HyphenationLocale::Other,
        }
    }
}

/// Candidate source for in-word break points.
enum PatternBackend {
    /// Knuth–Liang pattern dictionary.
    Patterns(Box<Standard>),
    /// Explicit exception list: lowercase word to break offsets in code
    /// units. Useful for hosts with precomputed hyphenation and for tests.
    WordList(HashMap<String, Vec<usize>>),
    /// No patterns; only the rule-based fallback applies.
    None,
}

impl std::fmt::Debug for PatternBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternBackend::Patterns(_) => f.write_str("Patterns"),
            PatternBackend::WordList(map) => write!(f, "WordList({} entries)", map.len()),
            PatternBackend::None => f.write_str("None"),
        }
    }
}

/// Per-locale hyphenation engine.
#[derive(Debug)]
pub struct Hyphenator {
    backend: PatternBackend,
    min_prefix: usize,
    min_suffix: usize,
    locale: HyphenationLocale,
}

impl Hyphenator {
    /// Builds a hyphenator around a loaded pattern dictionary.
    pub fn from_patterns(
        dictionary: Standard,
        min_prefix: usize,
        min_suffix: usize,
        locale_tag: &str,
    ) -> Self {
        Hyphenator {
            backend: PatternBackend::Patterns(Box::new(dictionary)),
            min_prefix,
            min_suffix,
            locale: HyphenationLocale::from_tag(locale_tag),
        }
    }

    /// Builds a hyphenator from the dictionary embedded for `locale_tag`,
    /// when one is bundled.
    pub fn from_embedded_patterns(
        locale_tag: &str,
        min_prefix: usize,
        min_suffix: usize,
    ) -> Option<Self> {
        let language = embedded_language(locale_tag)?;
        let dictionary = Standard::from_embedded(language).ok()?;
        Some(Self::from_patterns(dictionary, min_prefix, min_suffix, locale_tag))
    }

    /// Builds a hyphenator from an explicit word list mapping lowercase
    /// words to break offsets in code units.
    pub fn from_word_list<I>(entries: I, min_prefix: usize, min_suffix: usize, locale_tag: &str) -> Self
    where
        I: IntoIterator<Item = (String, Vec<usize>)>,
    {
        Hyphenator {
            backend: PatternBackend::WordList(entries.into_iter().collect()),
            min_prefix,
            min_suffix,
            locale: HyphenationLocale::from_tag(locale_tag),
        }
    }

    /// Builds a pattern-less hyphenator; only explicit hyphens, soft hyphens
    /// and locale rules produce breaks.
    pub fn without_patterns(locale_tag: &str) -> Self {
        Hyphenator {
            backend: PatternBackend::None,
            min_prefix: 0,
            min_suffix: 0,
            locale: HyphenationLocale::from_tag(locale_tag),
        }
    }

    /// Computes the break type for every position of `word`.
    ///
    /// `out[k]` describes breaking immediately before code unit `k`;
    /// `out[0]` is always `DontBreak`.
    pub fn hyphenate(&self, word: &[u16]) -> Vec<HyphenationType> {
        let n = word.len();
        if n >= self.min_prefix + self.min_suffix && n + 2 <= MAX_WORD_LEN {
            if let Some(out) = self.hyphenate_with_patterns(word) {
                return out;
            }
        }
        // The pattern alphabet never contains hyphens or soft hyphens, so
        // words carrying them always end up here.
        self.hyphenate_without_patterns(word)
    }

    /// Pattern/word-list lookup. Returns `None` when the word cannot be
    /// mapped (non-alphabetic content) or no backend is configured.
    fn hyphenate_with_patterns(&self, word: &[u16]) -> Option<Vec<HyphenationType>> {
        if matches!(self.backend, PatternBackend::None) {
            return None;
        }

        let n = word.len();
        let mut lowered = String::with_capacity(n);
        let mut unit_of_byte: HashMap<usize, usize> = HashMap::new();
        let mut hyphen_value = HyphenationType::BreakAndInsertHyphen;
        let mut i = 0;
        while i < n {
            let (cp, len) = utf16::code_point_at(word, i);
            let ch = char::from_u32(cp)?;
            if !ch.is_alphabetic() {
                return None;
            }
            if hyphen_value == HyphenationType::BreakAndInsertHyphen {
                hyphen_value = hyphenation_type_for_script(cp);
            }
            unit_of_byte.insert(lowered.len(), i);
            // Per-character lowercasing keeps break offsets aligned with the
            // original word.
            lowered.push(ch.to_lowercase().next().unwrap_or(ch));
            i += len;
        }

        let breaks: Vec<usize> = match &self.backend {
            PatternBackend::Patterns(dictionary) => {
                let word_breaks = dictionary.hyphenate(&lowered).breaks;
                word_breaks
                    .into_iter()
                    .filter_map(|byte| unit_of_byte.get(&byte).copied())
                    .collect()
            }
            PatternBackend::WordList(map) => map.get(&lowered).cloned().unwrap_or_default(),
            PatternBackend::None => return None,
        };

        let mut out = vec![HyphenationType::DontBreak; n];
        for k in breaks {
            if k >= self.min_prefix && k + self.min_suffix <= n {
                out[k] = hyphen_value;
            }
        }
        Some(out)
    }

    /// Rule-based fallback: explicit hyphens, soft hyphens and the Catalan
    /// middle-dot rule.
    fn hyphenate_without_patterns(&self, word: &[u16]) -> Vec<HyphenationType> {
        let n = word.len();
        let mut out = vec![HyphenationType::DontBreak; n];
        for i in 1..n {
            let prev = word[i - 1];
            if i > 1 && is_line_breaking_hyphen(prev) {
                // Break after an explicit hyphen; Polish and Slovenian repeat
                // it on the next line when Latin text follows.
                let (next_cp, _) = utf16::code_point_at(word, i);
                if (prev == CHAR_HYPHEN_MINUS || prev == CHAR_HYPHEN)
                    && matches!(self.locale, HyphenationLocale::Polish | HyphenationLocale::Slovenian)
                    && script_of(next_cp) == Script::Latin
                {
                    out[i] = HyphenationType::BreakAndInsertHyphenAtNextLine;
                } else {
                    out[i] = HyphenationType::BreakAndDontInsertHyphen;
                }
            } else if i > 1 && prev == CHAR_SOFT_HYPHEN {
                // Soft hyphens break with a script-appropriate glyph, but a
                // soft hyphen opening the word offers nothing useful.
                // Joining-type data would refine the Arabic case; without
                // it, every Arabic soft hyphen preserves shaping with a ZWJ
                // pair.
                let (next_cp, _) = utf16::code_point_at(word, i);
                out[i] = if script_of(next_cp) == Script::Arabic {
                    HyphenationType::BreakAndInsertHyphenAndZwj
                } else {
                    hyphenation_type_for_script(next_cp)
                };
            } else if prev == CHAR_MIDDLE_DOT
                && self.locale == HyphenationLocale::Catalan
                && i >= 2
                && self.min_prefix < i
                && i + self.min_suffix <= n
                && (word[i - 2] == 'l' as u16 || word[i - 2] == 'L' as u16)
                && (word[i] == 'l' as u16 || word[i] == 'L' as u16)
            {
                out[i] = HyphenationType::BreakAndReplaceWithHyphen;
            }
        }
        out
    }
}

/// Hyphen-like characters after which lines may break but which disable
/// pattern hyphenation for the word containing them.
fn is_line_breaking_hyphen(unit: u16) -> bool {
    matches!(unit, 0x002D | 0x058A | 0x05BE | 0x1400 | 0x2010 | 0x2013 | 0x2027 | 0x2E17 | 0x2E40)
}

fn script_of(code_point: u32) -> Script {
    char::from_u32(code_point).map(|c| c.script()).unwrap_or(Script::Unknown)
}

/// Scripts pick their own hyphen glyph, or none at all.
fn hyphenation_type_for_script(code_point: u32) -> HyphenationType {
    match script_of(code_point) {
        Script::Kannada | Script::Malayalam | Script::Tamil | Script::Telugu => {
            HyphenationType::BreakAndDontInsertHyphen
        }
        Script::Armenian => HyphenationType::BreakAndInsertArmenianHyphen,
        Script::Canadian_Aboriginal => HyphenationType::BreakAndInsertUcasHyphen,
        _ => HyphenationType::BreakAndInsertHyphen,
    }
}

fn embedded_language(locale_tag: &str) -> Option<Language> {
    let key = locale_tag.to_ascii_lowercase();
    let language = key.split(['-', '_']).next().unwrap_or(&key);
    Some(match (language, key.as_str()) {
        ("en", "en-gb") => Language::EnglishGB,
        ("en", _) => Language::EnglishUS,
        ("fr", _) => Language::French,
        ("de", _) => Language::German1996,
        ("es", _) => Language::Spanish,
        ("pt", _) => Language::Portuguese,
        ("it", _) => Language::Italian,
        ("nl", _) => Language::Dutch,
        ("pl", _) => Language::Polish,
        ("sl", _) => Language::Slovenian,
        ("ca", _) => Language::Catalan,
        ("da", _) => Language::Danish,
        ("sv", _) => Language::Swedish,
        ("fi", _) => Language::Finnish,
        ("cs", _) => Language::Czech,
        ("hu", _) => Language::Hungarian,
        ("ru", _) => Language::Russian,
        ("uk", _) => Language::Ukrainian,
        ("tr", _) => Language::Turkish,
        _ => return None,
    })
}

/// Registry of hyphenators keyed by locale.
///
/// Lookup tries the full `language-region` key first, then the bare
/// language. Readers only take the lock shared, so concurrent solver
/// invocations do not contend; `add`/`clear` are meant for host startup.
#[derive(Debug, Default)]
pub struct HyphenatorMap {
    inner: RwLock<HashMap<String, Arc<Hyphenator>>>,
}

static GLOBAL_MAP: Lazy<HyphenatorMap> = Lazy::new(HyphenatorMap::default);

impl HyphenatorMap {
    pub fn new() -> Self {
        HyphenatorMap::default()
    }

    /// The process-wide default map used by `break_line_greedy`.
    pub fn global() -> &'static HyphenatorMap {
        &GLOBAL_MAP
    }

    /// Registers a hyphenator for `locale_tag`, replacing any previous one.
    pub fn add(&self, locale_tag: &str, hyphenator: Hyphenator) {
        let key = locale_tag.to_ascii_lowercase();
        self.inner.write().expect("hyphenator map poisoned").insert(key, Arc::new(hyphenator));
    }

    /// Removes every registered hyphenator.
    pub fn clear(&self) {
        self.inner.write().expect("hyphenator map poisoned").clear();
    }

    /// Finds the hyphenator for the best matching locale in `locales`.
    pub fn lookup(&self, locales: &LocaleList) -> Option<Arc<Hyphenator>> {
        let map = self.inner.read().expect("hyphenator map poisoned");
        for locale in locales.iter() {
            if let Some(hyphenator) = map.get(&locale.lookup_key()) {
                return Some(hyphenator.clone());
            }
            if let Some(hyphenator) = map.get(locale.language()) {
                return Some(hyphenator.clone());
            }
        }
        None
    }
}
