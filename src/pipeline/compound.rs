//! Hyphenated compound decomposition.
//!
//! A word-like token that contains a hyphen and has no whole-token
//! dictionary entry is split into its parts.  Each distinct part gets its
//! own resolution (dictionary first, predictor later).  Decomposition is
//! single-level: parts never contain hyphens and are never split again.
//!
//! ```text
//! "Sahne-Eis" ──split──▶ ["Sahne", "Eis"] ──resolve each──▶ "ˈzaːnə" "aɪ̯s"
//!                                          ──join("-")─────▶ "ˈzaːnə-aɪ̯s"
//! ```

use crate::dictionary::DictionaryResolver;
use crate::pipeline::resolution::{ResolutionRecord, ResolutionTable};

/// Separator between compound parts, in both text and phonemes.
pub const COMPOUND_SEPARATOR: char = '-';

/// Returns `true` when `word` must be decomposed rather than predicted.
pub fn is_compound(word: &str) -> bool {
    word.contains(COMPOUND_SEPARATOR)
}

// ---------------------------------------------------------------------------
// CompoundSplit
// ---------------------------------------------------------------------------

/// The ordered parts of a compound.  Parts may be empty when hyphens are
/// adjacent or at either edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSplit {
    parts: Vec<String>,
}

impl CompoundSplit {
    pub fn split(word: &str) -> Self {
        Self {
            parts: word.split(COMPOUND_SEPARATOR).map(str::to_string).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Join the parts' phonemes with hyphens, or `None` if any part is
    /// still unresolved.
    pub fn join(&self, table: &ResolutionTable) -> Option<String> {
        let phonemes = self
            .parts
            .iter()
            .map(|part| table.get(part).map(|r| r.phonemes.as_str()))
            .collect::<Option<Vec<_>>>()?;
        Some(phonemes.join(&COMPOUND_SEPARATOR.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CompoundDecomposer
// ---------------------------------------------------------------------------

pub struct CompoundDecomposer<'a> {
    resolver: DictionaryResolver<'a>,
}

impl<'a> CompoundDecomposer<'a> {
    pub fn new(resolver: DictionaryResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Split `word` and give every part not yet in `table` an entry: empty
    /// parts resolve to `""`, dictionary hits are final, the rest pending.
    pub fn decompose(&self, word: &str, lang: &str, table: &mut ResolutionTable) -> CompoundSplit {
        let split = CompoundSplit::split(word);
        for part in split.parts() {
            if table.contains(part) {
                continue;
            }
            if part.is_empty() {
                table.insert(part, ResolutionRecord::empty());
            } else if let Some(hit) = self.resolver.resolve(part, lang) {
                table.insert(part, hit.into());
            } else {
                table.defer(part);
            }
        }
        split
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
