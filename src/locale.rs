//! # Locale Lists
//!
//! Loose BCP-47 parsing and the process-wide intern table that assigns a
//! stable `u32` id to every locale list description. `Paint` and replacement
//! runs carry these ids; the break stages resolve them back through
//! [`LocaleListCache`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A single parsed locale tag. Only the subtags the line breaker consults
/// are retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Parses one tag, e.g. `"en-US"`, `"sr-Latn"`, `"ja_JP"`.
    ///
    /// Returns `None` when the first subtag is not a plausible language code.
    pub fn parse(tag: &str) -> Option<Locale> {
        let mut subtags = tag.split(['-', '_']).filter(|s| !s.is_empty());
        let language = subtags.next()?;
        if language.len() < 2 || language.len() > 3 || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        let mut locale = Locale {
            language: language.to_ascii_lowercase(),
            script: None,
            region: None,
        };
        for subtag in subtags {
            if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
                if locale.script.is_none() {
                    let mut script = subtag.to_ascii_lowercase();
                    script[..1].make_ascii_uppercase();
                    locale.script = Some(script);
                }
            } else if (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
            {
                if locale.region.is_none() {
                    locale.region = Some(subtag.to_ascii_uppercase());
                }
            }
        }
        Some(locale)
    }

    /// Lowercase ISO 639 language code.
    #[inline]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[inline]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// `language-REGION` key used for hyphenator lookup, lowercase.
    pub(crate) fn lookup_key(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region.to_ascii_lowercase()),
            None => self.language.clone(),
        }
    }
}

/// An ordered, possibly empty list of locales.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocaleList {
    locales: Vec<Locale>,
}

impl LocaleList {
    /// Parses a comma- or whitespace-separated list of tags. Unparseable
    /// entries are dropped.
    pub fn parse(description: &str) -> LocaleList {
        let locales = description
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(Locale::parse)
            .collect();
        LocaleList { locales }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// The highest-priority locale, if any.
    #[inline]
    pub fn primary(&self) -> Option<&Locale> {
        self.locales.first()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }
}

struct CacheInner {
    ids: HashMap<String, u32>,
    lists: Vec<Arc<LocaleList>>,
}

static CACHE: Lazy<RwLock<CacheInner>> = Lazy::new(|| {
    RwLock::new(CacheInner {
        ids: HashMap::new(),
        lists: vec![Arc::new(LocaleList::default())],
    })
});

/// Process-wide intern table for locale lists.
///
/// Ids are stable for the lifetime of the process; id 0 is the empty list.
/// Reads take a shared lock, so concurrent lookups from many solver threads
/// are fine; writes only happen the first time a description is seen.
pub struct LocaleListCache;

impl LocaleListCache {
    /// Interns `description` and returns its id.
    pub fn get_id(description: &str) -> u32 {
        let key = description.trim();
        if key.is_empty() {
            return 0;
        }
        if let Some(&id) = CACHE.read().expect("locale cache poisoned").ids.get(key) {
            return id;
        }
        let mut inner = CACHE.write().expect("locale cache poisoned");
        if let Some(&id) = inner.ids.get(key) {
            return id;
        }
        let id = inner.lists.len() as u32;
        inner.lists.push(Arc::new(LocaleList::parse(key)));
        inner.ids.insert(key.to_owned(), id);
        id
    }

    /// Resolves an id back to its locale list. Unknown ids resolve to the
    /// empty list.
    pub fn get(id: u32) -> Arc<LocaleList> {
        let inner = CACHE.read().expect("locale cache poisoned");
        inner
            .lists
            .get(id as usize)
            .cloned()
            .unwrap_or_else(|| inner.lists[0].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_and_region() {
        let locale = Locale::parse("en-US").unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), Some("US"));
        assert_eq!(locale.lookup_key(), "en-us");
    }

    #[test]
    fn test_parse_with_script() {
        let locale = Locale::parse("sr_latn_RS").unwrap();
        assert_eq!(locale.language(), "sr");
        assert_eq!(locale.script, Some("Latn".to_owned()));
        assert_eq!(locale.region(), Some("RS"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_none());
        assert!(Locale::parse("x").is_none());
        assert!(Locale::parse("1234").is_none());
    }

    #[test]
    fn test_list_parse_mixed_separators() {
        let list = LocaleList::parse("ja-JP, en-US fr");
        let languages: Vec<&str> = list.iter().map(|l| l.language()).collect();
        assert_eq!(languages, vec!["ja", "en", "fr"]);
        assert_eq!(list.primary().unwrap().language(), "ja");
    }

    #[test]
    fn test_cache_ids_are_stable() {
        let a = LocaleListCache::get_id("en-US,fr-FR");
        let b = LocaleListCache::get_id("en-US,fr-FR");
        assert_eq!(a, b);
        assert_ne!(a, 0);
        let list = LocaleListCache::get(a);
        assert_eq!(list.primary().unwrap().language(), "en");
    }

    #[test]
    fn test_cache_empty_and_unknown() {
        assert_eq!(LocaleListCache::get_id(""), 0);
        assert!(LocaleListCache::get(0).is_empty());
        assert!(LocaleListCache::get(u32::MAX).is_empty());
    }
}
