//! Result of phonemizing a list of texts.

use std::collections::HashMap;

use crate::dictionary::strip_affixes;
use crate::predictor::Prediction;

/// Transcriptions for a list of texts plus the detail behind them.
///
/// `text`, `phonemes`, `split_text` and `split_phonemes` are parallel: entry
/// `i` of each belongs to input text `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhonemizerResult {
    /// The input texts.
    pub text: Vec<String>,
    /// One transcription per input text.
    pub phonemes: Vec<String>,
    /// Token sequence of each text after acronym expansion.
    pub split_text: Vec<Vec<String>>,
    /// Phonemes of each token; concatenated they give `phonemes[i]`.
    pub split_phonemes: Vec<Vec<String>>,
    /// Predictor output for every string that was sent to the predictor.
    pub predictions: HashMap<String, Prediction>,
}

impl PhonemizerResult {
    /// Map each input text to its transcription.
    pub fn transcriptions(&self) -> HashMap<&str, &str> {
        self.text
            .iter()
            .map(String::as_str)
            .zip(self.phonemes.iter().map(String::as_str))
            .collect()
    }

    /// Predictor detail for the words of text `index` that were predicted.
    pub fn predictions_for(&self, index: usize) -> Vec<(&str, &Prediction)> {
        let Some(tokens) = self.split_text.get(index) else {
            return Vec::new();
        };
        let mut seen: Vec<&str> = Vec::new();
        for token in tokens {
            for piece in token.split('-') {
                let core = strip_affixes(piece).core;
                if self.predictions.contains_key(core) && !seen.contains(&core) {
                    seen.push(core);
                }
            }
        }
        seen.into_iter()
            .filter_map(|w| self.predictions.get_key_value(w))
            .map(|(w, p)| (w.as_str(), p))
            .collect()
    }
}
