//! Symbol ↔ index tokenizer for sequence-to-sequence models.
//!
//! Index layout:
//!
//! ```text
//! 0            pad  "_"
//! 1 ..= L      language start tokens "<de>", "<en_us>", …
//! L + 1        end  "<end>"
//! L + 2 ..     symbols, in the order given
//! ```
//!
//! The same type serves the grapheme side (symbols are characters) and the
//! phoneme side (symbols are phoneme strings).

use std::collections::{HashMap, HashSet};

use crate::predictor::backend::PredictorError;

pub const PAD_TOKEN: &str = "_";
pub const END_TOKEN: &str = "<end>";

/// The start token for `lang`, e.g. `"<de>"`.
pub fn language_token(lang: &str) -> String {
    format!("<{lang}>")
}

// ---------------------------------------------------------------------------
// SequenceTokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SequenceTokenizer {
    token_to_idx: HashMap<String, usize>,
    idx_to_token: Vec<String>,
    special: HashSet<usize>,
    end_index: usize,
    lowercase: bool,
    char_repeats: usize,
    append_start_end: bool,
}

impl SequenceTokenizer {
    /// Build a tokenizer.
    ///
    /// * `symbols`          — model vocabulary (duplicates are ignored).
    /// * `languages`        — language codes that get a start token.
    /// * `lowercase`        — lower-case input symbols before lookup.
    /// * `char_repeats`     — repeat every input symbol this many times.
    /// * `append_start_end` — wrap sequences in `<lang>` … `<end>`.
    pub fn new<S: AsRef<str>>(
        symbols: &[S],
        languages: &[S],
        lowercase: bool,
        char_repeats: usize,
        append_start_end: bool,
    ) -> Self {
        let mut tokenizer = Self {
            token_to_idx: HashMap::new(),
            idx_to_token: Vec::new(),
            special: HashSet::new(),
            end_index: 0,
            lowercase,
            char_repeats: char_repeats.max(1),
            append_start_end,
        };

        let pad = tokenizer.push(PAD_TOKEN);
        tokenizer.special.insert(pad);
        for lang in languages {
            let idx = tokenizer.push(&language_token(lang.as_ref()));
            tokenizer.special.insert(idx);
        }
        tokenizer.end_index = tokenizer.push(END_TOKEN);
        tokenizer.special.insert(tokenizer.end_index);
        for symbol in symbols {
            tokenizer.push(symbol.as_ref());
        }

        tokenizer
    }

    fn push(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.token_to_idx.get(token) {
            return idx;
        }
        let idx = self.idx_to_token.len();
        self.idx_to_token.push(token.to_string());
        self.token_to_idx.insert(token.to_string(), idx);
        idx
    }

    pub fn vocab_size(&self) -> usize {
        self.idx_to_token.len()
    }

    pub fn pad_index(&self) -> usize {
        0
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn is_special(&self, idx: usize) -> bool {
        self.special.contains(&idx)
    }

    pub fn token(&self, idx: usize) -> Option<&str> {
        self.idx_to_token.get(idx).map(String::as_str)
    }

    /// Index of the start token for `lang`.
    pub fn language_index(&self, lang: &str) -> Result<usize, PredictorError> {
        self.token_to_idx
            .get(&language_token(lang))
            .copied()
            .ok_or_else(|| PredictorError::UnsupportedLanguage(lang.to_string()))
    }

    /// Encode a symbol sequence.  Unknown symbols are dropped.
    pub fn encode<I, S>(&self, symbols: I, lang: &str) -> Result<Vec<usize>, PredictorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = if self.append_start_end {
            Some(self.language_index(lang)?)
        } else {
            None
        };

        let mut ids: Vec<usize> = start.into_iter().collect();
        for symbol in symbols {
            let symbol = if self.lowercase {
                symbol.as_ref().to_lowercase()
            } else {
                symbol.as_ref().to_string()
            };
            if let Some(&idx) = self.token_to_idx.get(&symbol) {
                if !self.is_special(idx) {
                    ids.extend(std::iter::repeat(idx).take(self.char_repeats));
                }
            }
        }
        if self.append_start_end {
            ids.push(self.end_index);
        }
        Ok(ids)
    }

    /// Encode `text` character by character.
    pub fn encode_text(&self, text: &str, lang: &str) -> Result<Vec<usize>, PredictorError> {
        self.encode(text.chars().map(String::from), lang)
    }

    /// Map `ids` back to tokens, undoing char repeats.  Unknown ids are
    /// skipped; special tokens are dropped when `remove_special_tokens`.
    pub fn decode(&self, ids: &[usize], remove_special_tokens: bool) -> Vec<String> {
        self.collapse_repeats(ids)
            .into_iter()
            .filter(|idx| !(remove_special_tokens && self.is_special(*idx)))
            .filter_map(|idx| self.token(idx).map(str::to_string))
            .collect()
    }

    /// Like [`decode`](Self::decode) but keeps `scores` aligned with the
    /// surviving tokens.  Returns no scores when the lengths differ.
    pub fn decode_scored(
        &self,
        ids: &[usize],
        scores: &[f32],
        remove_special_tokens: bool,
    ) -> (Vec<String>, Vec<f32>) {
        if ids.len() != scores.len() || self.char_repeats != 1 {
            return (self.decode(ids, remove_special_tokens), Vec::new());
        }
        ids.iter()
            .zip(scores)
            .filter(|(idx, _)| !(remove_special_tokens && self.is_special(**idx)))
            .filter_map(|(&idx, &score)| self.token(idx).map(|t| (t.to_string(), score)))
            .unzip()
    }

    fn collapse_repeats(&self, ids: &[usize]) -> Vec<usize> {
        let n = self.char_repeats;
        if n == 1 {
            return ids.to_vec();
        }
        if self.append_start_end && ids.len() >= 2 {
            let last = ids.len() - 1;
            let mut out = vec![ids[0]];
            out.extend(ids[1..last].iter().step_by(n).copied());
            out.push(ids[last]);
            out
        } else {
            ids.iter().step_by(n).copied().collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graphemes() -> SequenceTokenizer {
        SequenceTokenizer::new(&["a", "b", "e", "i", "s"], &["de", "en_us"], true, 1, true)
    }

    #[test]
    fn layout_puts_specials_first() {
        let t = graphemes();
        assert_eq!(t.token(0), Some(PAD_TOKEN));
        assert_eq!(t.token(1), Some("<de>"));
        assert_eq!(t.token(2), Some("<en_us>"));
        assert_eq!(t.token(3), Some(END_TOKEN));
        assert_eq!(t.end_index(), 3);
        assert_eq!(t.vocab_size(), 9);
    }

    #[test]
    fn encode_wraps_with_language_and_end() {
        let t = graphemes();
        let ids = t.encode_text("Eis", "de").unwrap();
        assert_eq!(ids, vec![1, 6, 7, 8, 3]);
    }

    #[test]
    fn encode_drops_unknown_symbols() {
        let t = graphemes();
        let ids = t.encode_text("?x", "de").unwrap();
        assert_eq!(ids, vec![1, 3]);
        assert!(t.decode(&ids, true).is_empty());
    }

    #[test]
    fn encode_unknown_language_errors() {
        let t = graphemes();
        let err = t.encode_text("ab", "fr").unwrap_err();
        assert!(matches!(err, PredictorError::UnsupportedLanguage(ref l) if l == "fr"));
    }

    #[test]
    fn decode_removes_specials_on_request() {
        let t = graphemes();
        let ids = t.encode_text("ab", "de").unwrap();
        assert_eq!(t.decode(&ids, true), vec!["a", "b"]);
        assert_eq!(t.decode(&ids, false), vec!["<de>", "a", "b", "<end>"]);
    }

    #[test]
    fn char_repeats_round_trip() {
        let t = SequenceTokenizer::new(&["a", "b"], &["de"], false, 2, true);
        let ids = t.encode_text("ab", "de").unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(t.decode(&ids, true), vec!["a", "b"]);
    }

    #[test]
    fn decode_scored_keeps_alignment() {
        let t = SequenceTokenizer::new(&["aɪ̯", "s"], &["de"], false, 1, true);
        let ids = vec![1, 3, 4, 2];
        let (tokens, scores) = t.decode_scored(&ids, &[1.0, 0.9, 0.8, 1.0], true);
        assert_eq!(tokens, vec!["aɪ̯", "s"]);
        assert_eq!(scores, vec![0.9, 0.8]);
    }

    #[test]
    fn decode_scored_drops_misaligned_scores() {
        let t = SequenceTokenizer::new(&["s"], &["de"], false, 1, true);
        let (tokens, scores) = t.decode_scored(&[3], &[], true);
        assert_eq!(tokens, vec!["s"]);
        assert!(scores.is_empty());
    }
}
