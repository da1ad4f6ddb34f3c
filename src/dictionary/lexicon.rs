//! Per-language phonetic dictionary.
//!
//! [`PhoneticDictionary`] maps a language code to a table of
//! `word-form → phonemes`.  It is built once (in code or from a JSON file)
//! and then shared read-only by every resolution step.
//!
//! # File format
//!
//! ```json
//! {
//!   "de": { "E-Mail": "ˈiːmeɪ̯l", "Eis": "aɪ̯s" },
//!   "en_us": { "Bob": "bɑb" }
//! }
//! ```
//!
//! Malformed files are rejected as a whole when loading; nothing is checked
//! per token later.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DictionaryError
// ---------------------------------------------------------------------------

/// Errors raised while loading a phonetic dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The dictionary file could not be read.
    #[error("failed to read phonetic dictionary: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("failed to parse phonetic dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an object keyed by language.
    #[error("phonetic dictionary must be an object keyed by language code")]
    NotAnObject,

    /// A language entry is not an object of word → phonemes.
    #[error("entries for language `{lang}` must be an object of word to phonemes")]
    InvalidLanguage { lang: String },

    /// A word maps to something other than a phoneme string.
    #[error("entry `{key}` in language `{lang}` must map to a string")]
    InvalidEntry { lang: String, key: String },
}

// ---------------------------------------------------------------------------
// PhoneticDictionary
// ---------------------------------------------------------------------------

/// Immutable mapping `language → (word-form → phonemes)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneticDictionary {
    languages: HashMap<String, HashMap<String, String>>,
}

impl PhoneticDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) the table for `lang`.  Builder-style, used while the
    /// dictionary is being assembled; the finished value is never mutated.
    pub fn with_language<I, K, V>(mut self, lang: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.languages.entry(lang.into()).or_default();
        table.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Parse and validate a JSON dictionary.
    pub fn from_json_str(data: &str) -> Result<Self, DictionaryError> {
        let root: Value = serde_json::from_str(data)?;
        let Value::Object(langs) = root else {
            return Err(DictionaryError::NotAnObject);
        };

        let mut languages = HashMap::with_capacity(langs.len());
        for (lang, entries) in langs {
            let Value::Object(entries) = entries else {
                return Err(DictionaryError::InvalidLanguage { lang });
            };
            let mut table = HashMap::with_capacity(entries.len());
            for (key, value) in entries {
                match value {
                    Value::String(phonemes) => {
                        table.insert(key, phonemes);
                    }
                    _ => return Err(DictionaryError::InvalidEntry { lang, key }),
                }
            }
            languages.insert(lang, table);
        }

        Ok(Self { languages })
    }

    /// Load a JSON dictionary from `path`.
    pub fn load_from(path: &Path) -> Result<Self, DictionaryError> {
        let data = std::fs::read_to_string(path)?;
        let dictionary = Self::from_json_str(&data)?;
        log::info!(
            "loaded phonetic dictionary from {} ({} languages, {} entries)",
            path.display(),
            dictionary.languages.len(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// The word table for `lang`, if any.
    pub fn language(&self, lang: &str) -> Option<&HashMap<String, String>> {
        self.languages.get(lang)
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// Exact lookup, no case folding.
    pub fn get(&self, lang: &str, word: &str) -> Option<&str> {
        self.language(lang)?.get(word).map(String::as_str)
    }

    /// Total number of entries across all languages.
    pub fn len(&self) -> usize {
        self.languages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<HashMap<String, HashMap<String, String>>> for PhoneticDictionary {
    fn from(languages: HashMap<String, HashMap<String, String>>) -> Self {
        Self { languages }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
