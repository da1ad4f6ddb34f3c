//! Dictionary resolution of a single token.
//!
//! ```text
//! token ──▶ delimiter? ──yes──▶ passthrough
//!              │no
//!              ▼
//!      strip affixes  "(Bob)" → "(" + "Bob" + ")"
//!              │
//!              ▼
//!      LOOKUP_ORDER: Exact → Lowercase → Titlecase   (first hit wins)
//!              │
//!              ▼
//!      left + phonemes + right
//! ```

use std::borrow::Cow;

use crate::dictionary::lexicon::PhoneticDictionary;
use crate::text::Punctuation;

// ---------------------------------------------------------------------------
// Lookup strategies
// ---------------------------------------------------------------------------

/// One way of turning a word core into a dictionary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// The core as written.
    Exact,
    /// Fully lower-cased.
    Lowercase,
    /// First letter of every word segment upper-cased, the rest lower-cased.
    Titlecase,
}

/// Order in which the strategies are tried.
pub const LOOKUP_ORDER: [LookupStrategy; 3] = [
    LookupStrategy::Exact,
    LookupStrategy::Lowercase,
    LookupStrategy::Titlecase,
];

impl LookupStrategy {
    /// The dictionary key this strategy derives from `core`.
    pub fn key<'a>(self, core: &'a str) -> Cow<'a, str> {
        match self {
            LookupStrategy::Exact => Cow::Borrowed(core),
            LookupStrategy::Lowercase => Cow::Owned(core.to_lowercase()),
            LookupStrategy::Titlecase => Cow::Owned(title_case(core)),
        }
    }
}

/// Title-case `text`: a cased character is upper-cased when it follows a
/// non-cased character (or starts the string), and lower-cased otherwise.
///
/// `"sahne-eis"` → `"Sahne-Eis"`, `"FOO"` → `"Foo"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for ch in text.chars() {
        if previous_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_cased = ch.is_lowercase() || ch.is_uppercase();
    }
    out
}

// ---------------------------------------------------------------------------
// Affix stripping
// ---------------------------------------------------------------------------

/// A word split into leading non-alphanumerics, core, and trailing
/// non-alphanumerics.  `left + core + right` is always the original word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affixes<'a> {
    pub left: &'a str,
    pub core: &'a str,
    pub right: &'a str,
}

/// Split off the leading and trailing non-alphanumeric runs of `word`.
///
/// A word without any alphanumeric character is kept whole as the core, so
/// entries such as `"-"` stay reachable in the dictionary.
pub fn strip_affixes(word: &str) -> Affixes<'_> {
    let start = word
        .char_indices()
        .find(|(_, ch)| ch.is_alphanumeric())
        .map(|(idx, _)| idx);
    let end = word
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_alphanumeric())
        .map(|(idx, ch)| idx + ch.len_utf8());

    match (start, end) {
        (Some(start), Some(end)) => Affixes {
            left: &word[..start],
            core: &word[start..end],
            right: &word[end..],
        },
        _ => Affixes {
            left: "",
            core: word,
            right: "",
        },
    }
}

// ---------------------------------------------------------------------------
// DictionaryResolver
// ---------------------------------------------------------------------------

/// A successful dictionary resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryMatch {
    /// The token is a single delimiter and is copied verbatim.
    Passthrough(String),
    /// The core was found with `strategy`; `phonemes` already carries the
    /// original affixes.
    Entry {
        phonemes: String,
        strategy: LookupStrategy,
    },
}

impl DictionaryMatch {
    pub fn phonemes(&self) -> &str {
        match self {
            DictionaryMatch::Passthrough(text) => text,
            DictionaryMatch::Entry { phonemes, .. } => phonemes,
        }
    }
}

/// Resolves tokens against an optional [`PhoneticDictionary`].
#[derive(Debug, Clone, Copy)]
pub struct DictionaryResolver<'a> {
    dictionary: Option<&'a PhoneticDictionary>,
    punctuation: &'a Punctuation,
}

impl<'a> DictionaryResolver<'a> {
    pub fn new(dictionary: Option<&'a PhoneticDictionary>, punctuation: &'a Punctuation) -> Self {
        Self {
            dictionary,
            punctuation,
        }
    }

    /// Resolve `token` for `lang`, or `None` when the dictionary has no
    /// matching entry.
    pub fn resolve(&self, token: &str, lang: &str) -> Option<DictionaryMatch> {
        if self.punctuation.is_delimiter_token(token) {
            return Some(DictionaryMatch::Passthrough(token.to_string()));
        }

        let table = self.dictionary?.language(lang)?;
        let Affixes { left, core, right } = strip_affixes(token);

        LOOKUP_ORDER.iter().find_map(|&strategy| {
            let key = strategy.key(core);
            table.get(&*key).map(|phonemes| DictionaryMatch::Entry {
                phonemes: format!("{left}{phonemes}{right}"),
                strategy,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
