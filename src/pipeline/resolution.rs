//! Per-call resolution bookkeeping.
//!
//! [`ResolutionTable`] holds exactly one entry per distinct token or part
//! string seen in a call.  An entry is either pending (waiting for the
//! predictor) or a final [`ResolutionRecord`].  Records are written at most
//! once; the table lives only as long as the call that built it.
//!
//! Words with leading or trailing punctuation are deferred by their
//! alphanumeric core: only the core is predicted, and the affixes are put
//! back around its phonemes once the prediction is in.

use std::collections::HashMap;

use crate::dictionary::{strip_affixes, Affixes, DictionaryMatch, LookupStrategy};

// ---------------------------------------------------------------------------
// ResolutionRecord
// ---------------------------------------------------------------------------

/// How a string got its phonemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A delimiter, copied verbatim.
    Punctuation,
    /// A dictionary entry found with the given strategy.
    Dictionary(LookupStrategy),
    /// Parts resolved independently and joined with hyphens.
    Compound,
    /// Produced by the predictor.
    Predicted,
    /// Nothing to phonemize; resolves to the empty string.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRecord {
    pub phonemes: String,
    pub source: ResolutionSource,
}

impl ResolutionRecord {
    pub fn new(phonemes: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            phonemes: phonemes.into(),
            source,
        }
    }

    pub fn empty() -> Self {
        Self::new(String::new(), ResolutionSource::Empty)
    }
}

impl From<DictionaryMatch> for ResolutionRecord {
    fn from(m: DictionaryMatch) -> Self {
        match m {
            DictionaryMatch::Passthrough(text) => Self::new(text, ResolutionSource::Punctuation),
            DictionaryMatch::Entry { phonemes, strategy } => {
                Self::new(phonemes, ResolutionSource::Dictionary(strategy))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ResolutionTable
// ---------------------------------------------------------------------------

/// A deferred word whose phonemes are its core's, wrapped in its affixes.
#[derive(Debug)]
struct Wrapped {
    word: String,
    left: String,
    core: String,
    right: String,
}

#[derive(Debug, Default)]
pub struct ResolutionTable {
    records: HashMap<String, Option<ResolutionRecord>>,
    /// Pending strings in first-seen order.
    pending: Vec<String>,
    wrapped: Vec<Wrapped>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `word` has an entry, pending or final.
    pub fn contains(&self, word: &str) -> bool {
        self.records.contains_key(word)
    }

    /// The final record for `word`, if resolved.
    pub fn get(&self, word: &str) -> Option<&ResolutionRecord> {
        self.records.get(word).and_then(Option::as_ref)
    }

    /// Store a final record.  Returns `false` (and keeps the old record) if
    /// `word` was already resolved.
    pub fn insert(&mut self, word: &str, record: ResolutionRecord) -> bool {
        match self.records.get_mut(word) {
            Some(Some(_)) => false,
            Some(slot) => {
                *slot = Some(record);
                true
            }
            None => {
                self.records.insert(word.to_string(), Some(record));
                true
            }
        }
    }

    /// Register `word` as waiting for the predictor.  No-op if it already
    /// has an entry.
    pub fn mark_pending(&mut self, word: &str) {
        if !self.contains(word) {
            self.records.insert(word.to_string(), None);
            self.pending.push(word.to_string());
        }
    }

    /// Register `word` for prediction.  Leading and trailing
    /// non-alphanumeric runs are set aside and only the core is queued, so
    /// `"Eis"` and `"(Eis!"` share one prediction.
    pub fn defer(&mut self, word: &str) {
        if self.contains(word) {
            return;
        }
        let Affixes { left, core, right } = strip_affixes(word);
        if left.is_empty() && right.is_empty() {
            self.mark_pending(word);
            return;
        }
        self.records.insert(word.to_string(), None);
        self.wrapped.push(Wrapped {
            word: word.to_string(),
            left: left.to_string(),
            core: core.to_string(),
            right: right.to_string(),
        });
        self.mark_pending(core);
    }

    /// Strings still waiting for the predictor, in first-seen order.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Remove and return the pending queue.  Entries stay registered until
    /// a record is inserted for them.
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    /// Write a record for every deferred word whose core is now resolved.
    /// The record keeps the core's source.
    pub fn resolve_wrapped(&mut self) {
        for wrapped in std::mem::take(&mut self.wrapped) {
            let Some(core) = self.get(&wrapped.core) else {
                self.wrapped.push(wrapped);
                continue;
            };
            let record = ResolutionRecord::new(
                format!("{}{}{}", wrapped.left, core.phonemes, wrapped.right),
                core.source,
            );
            self.insert(&wrapped.word, record);
        }
    }

    /// Number of distinct strings with an entry.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count final records whose source satisfies `predicate`.
    pub fn count_where(&self, predicate: impl Fn(ResolutionSource) -> bool) -> usize {
        self.records
            .values()
            .flatten()
            .filter(|r| predicate(r.source))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_written_once() {
        let mut table = ResolutionTable::new();
        assert!(table.insert("Eis", ResolutionRecord::new("a", ResolutionSource::Predicted)));
        assert!(!table.insert("Eis", ResolutionRecord::new("b", ResolutionSource::Predicted)));
        assert_eq!(table.get("Eis").map(|r| r.phonemes.as_str()), Some("a"));
    }

    #[test]
    fn pending_keeps_first_seen_order_without_duplicates() {
        let mut table = ResolutionTable::new();
        table.mark_pending("b");
        table.mark_pending("a");
        table.mark_pending("b");
        assert_eq!(table.pending(), ["b".to_string(), "a".to_string()]);
        assert!(table.contains("a"));
        assert!(table.get("a").is_none());
    }

    #[test]
    fn take_pending_drains_the_queue() {
        let mut table = ResolutionTable::new();
        table.mark_pending("a");
        table.mark_pending("b");
        assert_eq!(table.take_pending(), ["a".to_string(), "b".to_string()]);
        assert!(table.pending().is_empty());

        // still registered, so it is not queued twice
        table.mark_pending("a");
        assert!(table.pending().is_empty());

        table.insert("a", ResolutionRecord::new("x", ResolutionSource::Predicted));
        assert_eq!(table.count_where(|s| s == ResolutionSource::Predicted), 1);
    }

    #[test]
    fn deferred_words_queue_their_core_once() {
        let mut table = ResolutionTable::new();
        table.defer("\"Eis\"");
        table.defer("Eis");
        table.defer("(Eis!");
        table.defer("Torte");
        assert_eq!(table.pending(), ["Eis".to_string(), "Torte".to_string()]);
        assert!(table.contains("(Eis!"));
    }

    #[test]
    fn wrapped_words_take_core_phonemes_inside_affixes() {
        let mut table = ResolutionTable::new();
        table.defer("\"Eis,");
        table.resolve_wrapped();
        assert!(table.get("\"Eis,").is_none());

        table.take_pending();
        table.insert("Eis", ResolutionRecord::new("aɪ̯s", ResolutionSource::Predicted));
        table.resolve_wrapped();

        assert_eq!(
            table.get("\"Eis,"),
            Some(&ResolutionRecord::new("\"aɪ̯s,", ResolutionSource::Predicted))
        );
    }

    #[test]
    fn resolved_word_is_never_marked_pending() {
        let mut table = ResolutionTable::new();
        table.insert("a", ResolutionRecord::empty());
        table.mark_pending("a");
        assert!(table.pending().is_empty());
    }

    #[test]
    fn dictionary_match_converts_to_record() {
        let record: ResolutionRecord = DictionaryMatch::Passthrough(",".into()).into();
        assert_eq!(record.source, ResolutionSource::Punctuation);

        let record: ResolutionRecord = DictionaryMatch::Entry {
            phonemes: "b".into(),
            strategy: LookupStrategy::Lowercase,
        }
        .into();
        assert_eq!(
            record,
            ResolutionRecord::new("b", ResolutionSource::Dictionary(LookupStrategy::Lowercase))
        );
    }
}
