//! Phonemizer — drives the full text → phonemes resolution pipeline.
//!
//! # Pipeline flow
//!
//! ```text
//! text
//!   └─▶ Segmenter            words + delimiters (lossless)
//!         └─▶ AcronymExpander  "SPD" → "S-P-D"
//!               └─▶ per distinct token:
//!                     delimiter / empty      → final
//!                     DictionaryResolver hit → final
//!                     contains '-'           → CompoundDecomposer (parts: dict or pending)
//!                     otherwise              → pending (core only, affixes set aside)
//!                           └─▶ PredictionBatcher   one predictor call for all pending
//!                                 └─▶ reassemble     concatenate per-token phonemes
//! ```
//!
//! All bookkeeping lives in a [`ResolutionTable`] local to the call, so one
//! `Phonemizer` can serve concurrent calls without locking.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::TextConfig;
use crate::dictionary::{DictionaryResolver, PhoneticDictionary};
use crate::pipeline::batcher::PredictionBatcher;
use crate::pipeline::compound::{is_compound, CompoundDecomposer, CompoundSplit};
use crate::pipeline::reassemble::resolve_tokens;
use crate::pipeline::resolution::{ResolutionRecord, ResolutionSource, ResolutionTable};
use crate::pipeline::result::PhonemizerResult;
use crate::predictor::{Predictor, PredictorError};
use crate::text::{AcronymExpander, Punctuation, Segmenter, Token};

// ---------------------------------------------------------------------------
// PhonemizerError
// ---------------------------------------------------------------------------

/// Errors that fail a whole phonemization call.  There is no partial output.
#[derive(Debug, Error)]
pub enum PhonemizerError {
    /// The predictor failed; no transcription is produced.
    #[error("phoneme prediction failed: {0}")]
    Predictor(#[from] PredictorError),

    /// The predictor answered a batch with the wrong number of results.
    #[error("predictor returned {got} results for {expected} words")]
    CountMismatch { expected: usize, got: usize },

    /// A token reached reassembly without a resolution.
    #[error("token {0:?} was left unresolved")]
    Unresolved(String),
}

// ---------------------------------------------------------------------------
// Phonemizer
// ---------------------------------------------------------------------------

/// Converts text to phonemes using an optional dictionary and a predictor.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use phonemizer::config::PredictorConfig;
/// use phonemizer::dictionary::PhoneticDictionary;
/// use phonemizer::pipeline::Phonemizer;
/// use phonemizer::predictor::ApiPredictor;
///
/// # async fn example() -> Result<(), phonemizer::pipeline::PhonemizerError> {
/// let dictionary = PhoneticDictionary::new().with_language("de", [("E-Mail", "ˈiːmeɪ̯l")]);
/// let phonemizer = Phonemizer::new(Arc::new(ApiPredictor::from_config(&PredictorConfig::default())))
///     .with_dictionary(dictionary);
///
/// let phonemes = phonemizer.phonemize("Der E-Mail kleine SPD.", "de").await?;
/// println!("{phonemes}");
/// # Ok(())
/// # }
/// ```
pub struct Phonemizer {
    predictor: Arc<dyn Predictor>,
    dictionary: Option<Arc<PhoneticDictionary>>,
    segmenter: Segmenter,
    acronyms: AcronymExpander,
}

impl Phonemizer {
    /// A phonemizer with default punctuation, acronym expansion on and no
    /// dictionary.
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            dictionary: None,
            segmenter: Segmenter::default(),
            acronyms: AcronymExpander::default(),
        }
    }

    /// Build from the `[text]` config section.
    pub fn from_config(
        config: &TextConfig,
        dictionary: Option<PhoneticDictionary>,
        predictor: Arc<dyn Predictor>,
    ) -> Self {
        let phonemizer = Self::new(predictor)
            .with_punctuation(&config.punctuation)
            .with_acronym_expansion(config.expand_acronyms);
        match dictionary {
            Some(dictionary) => phonemizer.with_dictionary(dictionary),
            None => phonemizer,
        }
    }

    pub fn with_dictionary(mut self, dictionary: PhoneticDictionary) -> Self {
        self.dictionary = Some(Arc::new(dictionary));
        self
    }

    /// Replace the delimiter set; a space is always included.
    pub fn with_punctuation(mut self, punctuation: &str) -> Self {
        self.segmenter = Segmenter::new(Punctuation::new(punctuation));
        self
    }

    pub fn with_acronym_expansion(mut self, enabled: bool) -> Self {
        self.acronyms = AcronymExpander::new(enabled);
        self
    }

    pub fn dictionary(&self) -> Option<&PhoneticDictionary> {
        self.dictionary.as_deref()
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Phonemize a single text.
    pub async fn phonemize(&self, text: &str, lang: &str) -> Result<String, PhonemizerError> {
        let mut result = self.phonemize_list(&[text], lang).await?;
        Ok(result.phonemes.pop().unwrap_or_default())
    }

    /// Phonemize several texts with a single predictor call for all of them.
    pub async fn phonemize_list<S: AsRef<str>>(
        &self,
        texts: &[S],
        lang: &str,
    ) -> Result<PhonemizerResult, PhonemizerError> {
        let split_text: Vec<Vec<Token>> = texts
            .iter()
            .map(|text| self.acronyms.apply(self.segmenter.segment(text.as_ref())))
            .collect();

        let mut table = ResolutionTable::new();
        let mut compounds: HashMap<String, CompoundSplit> = HashMap::new();
        self.resolve_known(split_text.iter().flatten(), lang, &mut table, &mut compounds);

        log::debug!(
            "phonemizer: {} texts, {} distinct strings, {} dictionary hits, {} compounds, {} to predict",
            texts.len(),
            table.len(),
            table.count_where(|s| matches!(s, ResolutionSource::Dictionary(_))),
            compounds.len(),
            table.pending().len()
        );

        let predictions = PredictionBatcher::new(self.predictor.as_ref())
            .run(&mut table, lang)
            .await?;

        for (word, split) in &compounds {
            let phonemes = split
                .join(&table)
                .ok_or_else(|| PhonemizerError::Unresolved(word.clone()))?;
            table.insert(word, ResolutionRecord::new(phonemes, ResolutionSource::Compound));
        }

        let mut result = PhonemizerResult {
            predictions,
            ..PhonemizerResult::default()
        };
        for (text, tokens) in texts.iter().zip(split_text) {
            let pieces = resolve_tokens(&tokens, &table, &compounds)?;
            result.text.push(text.as_ref().to_string());
            result.phonemes.push(pieces.concat());
            result
                .split_text
                .push(tokens.iter().map(|t| t.text().to_string()).collect());
            result.split_phonemes.push(pieces);
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Resolution passes
    // -----------------------------------------------------------------------

    /// Give every distinct token a table entry, or a compound split.
    fn resolve_known<'t>(
        &self,
        tokens: impl Iterator<Item = &'t Token>,
        lang: &str,
        table: &mut ResolutionTable,
        compounds: &mut HashMap<String, CompoundSplit>,
    ) {
        let resolver = DictionaryResolver::new(self.dictionary.as_deref(), self.segmenter.punctuation());
        let decomposer = CompoundDecomposer::new(resolver);

        for token in tokens {
            let text = token.text();
            if table.contains(text) || compounds.contains_key(text) {
                continue;
            }

            if !token.is_word() {
                table.insert(text, ResolutionRecord::new(text, ResolutionSource::Punctuation));
            } else if text.is_empty() {
                table.insert(text, ResolutionRecord::empty());
            } else if let Some(hit) = resolver.resolve(text, lang) {
                table.insert(text, hit.into());
            } else if is_compound(text) {
                let split = decomposer.decompose(text, lang, table);
                compounds.insert(text.to_string(), split);
            } else {
                table.defer(text);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{MockPredictor, Prediction};

    fn phonemizer(predictor: Arc<MockPredictor>) -> Phonemizer {
        Phonemizer::new(predictor)
    }

    fn german(entries: &[(&str, &str)]) -> PhoneticDictionary {
        PhoneticDictionary::new().with_language("de", entries.iter().copied())
    }

    // --- dictionary precedence ---

    #[tokio::test]
    async fn dictionary_hit_skips_predictor() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("Eis", "aɪ̯s")]));

        assert_eq!(p.phonemize("Eis", "de").await.unwrap(), "aɪ̯s");
        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn whole_compound_entry_is_not_decomposed() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("E-Mail", "ˈiːmeɪ̯l")]));

        assert_eq!(p.phonemize("E-Mail", "de").await.unwrap(), "ˈiːmeɪ̯l");
        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn compound_parts_resolve_independently() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone())
            .with_dictionary(german(&[("Sahne", "ˈzaːnə"), ("Eis", "aɪ̯s")]));

        assert_eq!(p.phonemize("Sahne-Eis", "de").await.unwrap(), "ˈzaːnə-aɪ̯s");
        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_compound_parts_are_predicted() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("Prinzen", "pʁɪnʦn̩")]));

        let out = p.phonemize("Prinzen-König", "de").await.unwrap();
        assert_eq!(out, "pʁɪnʦn̩-[könig]");
        assert_eq!(predictor.submitted(), vec!["König".to_string()]);
    }

    // --- punctuation and affixes ---

    #[tokio::test]
    async fn punctuation_is_copied_verbatim() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone())
            .with_punctuation(".,")
            .with_dictionary(german(&[("Hi", "haɪ"), ("Bob", "bɔp")]));

        assert_eq!(p.phonemize("Hi, Bob.", "de").await.unwrap(), "haɪ, bɔp.");
        assert_eq!(predictor.call_count(), 0);
    }

    #[tokio::test]
    async fn affixes_wrap_dictionary_phonemes() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor).with_dictionary(german(&[("Bob", "b")]));
        assert_eq!(p.phonemize("(Bob)", "de").await.unwrap(), "(b)");
    }

    #[tokio::test]
    async fn affixes_wrap_predicted_phonemes() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("Bob", "b")]));

        let out = p.phonemize("\"Bob\" \"Eis\" Eis", "de").await.unwrap();

        assert_eq!(out, "\"b\" \"[eis]\" [eis]");
        assert_eq!(predictor.submitted(), vec!["Eis".to_string()]);
    }

    #[tokio::test]
    async fn affixed_compound_parts_keep_their_affixes() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("Sahne", "ˈzaːnə")]));

        let result = p.phonemize_list(&["\"Sahne-Eis\""], "de").await.unwrap();

        assert_eq!(result.phonemes[0], "\"ˈzaːnə-[eis]\"");
        assert_eq!(predictor.submitted(), vec!["Eis".to_string()]);
        let words: Vec<&str> = result.predictions_for(0).into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["Eis"]);
    }

    #[tokio::test]
    async fn consecutive_delimiters_resolve_to_nothing() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone());
        assert_eq!(p.phonemize("..  ", "de").await.unwrap(), "..  ");
        assert_eq!(p.phonemize("", "de").await.unwrap(), "");
        assert_eq!(predictor.call_count(), 0);
    }

    // --- acronyms ---

    #[tokio::test]
    async fn acronym_behaves_like_spelled_compound() {
        let dict = german(&[("S", "ɛs"), ("P", "peː"), ("D", "deː")]);

        let a = phonemizer(Arc::new(MockPredictor::new())).with_dictionary(dict.clone());
        let b = phonemizer(Arc::new(MockPredictor::new())).with_dictionary(dict);

        let expanded = a.phonemize("die SPD", "de").await.unwrap();
        let spelled = b.phonemize("die S-P-D", "de").await.unwrap();
        assert_eq!(expanded, spelled);
        assert_eq!(expanded, "[die] ɛs-peː-deː");
    }

    #[tokio::test]
    async fn acronym_expansion_can_be_disabled() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_acronym_expansion(false);
        assert_eq!(p.phonemize("SPD", "de").await.unwrap(), "[spd]");
        assert_eq!(predictor.submitted(), vec!["SPD".to_string()]);
    }

    // --- batching and uniqueness ---

    #[tokio::test]
    async fn repeated_tokens_are_resolved_once() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone());

        let out = p.phonemize("Eis Eis Torte Eis-Torte", "de").await.unwrap();

        assert_eq!(out, "[eis] [eis] [torte] [eis]-[torte]");
        assert_eq!(predictor.call_count(), 1);
        assert_eq!(
            predictor.submitted(),
            vec!["Eis".to_string(), "Torte".to_string()]
        );
    }

    #[tokio::test]
    async fn list_uses_one_batch_for_all_texts() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone());

        let result = p
            .phonemize_list(&["Eis und Torte", "Torte, Eis."], "de")
            .await
            .unwrap();

        assert_eq!(predictor.call_count(), 1);
        assert_eq!(predictor.submitted().len(), 3);
        assert_eq!(result.phonemes[1], "[torte], [eis].");
        assert_eq!(result.transcriptions()["Eis und Torte"], "[eis] [und] [torte]");
        assert_eq!(result.predictions.len(), 3);
    }

    #[tokio::test]
    async fn split_phonemes_concatenate_to_transcription() {
        let p = phonemizer(Arc::new(MockPredictor::new()));
        let result = p.phonemize_list(&["Der E-Mail, SPD!"], "de").await.unwrap();

        assert_eq!(result.split_text[0].concat(), "Der E-Mail, S-P-D!");
        assert_eq!(result.split_phonemes[0].concat(), result.phonemes[0]);
        assert_eq!(result.split_text[0].len(), result.split_phonemes[0].len());
    }

    #[tokio::test]
    async fn predicted_detail_is_surfaced() {
        let detail = Prediction {
            phonemes: "tɔʁtə".into(),
            tokens: vec!["t".into(), "ɔ".into(), "ʁ".into(), "t".into(), "ə".into()],
            probabilities: vec![0.9, 0.8, 0.7, 0.9, 0.6],
            confidence: Some(0.27),
        };
        let predictor = Arc::new(MockPredictor::new().with_prediction("Torte", detail.clone()));
        let p = phonemizer(predictor);

        let result = p.phonemize_list(&["Torte"], "de").await.unwrap();
        assert_eq!(result.phonemes[0], "tɔʁtə");
        assert_eq!(result.predictions["Torte"], detail);
    }

    // --- hyphen edge cases ---

    #[tokio::test]
    async fn predictor_never_sees_hyphens() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone());
        p.phonemize("Ost-West-Konflikt a--b -x- -", "de").await.unwrap();
        assert!(predictor.submitted().iter().all(|w| !w.contains('-')));
        assert!(predictor.submitted().iter().all(|w| !w.is_empty()));
    }

    #[tokio::test]
    async fn empty_compound_parts_keep_their_hyphens() {
        let p = phonemizer(Arc::new(MockPredictor::new()));
        assert_eq!(p.phonemize("a--b", "de").await.unwrap(), "[a]--[b]");
        assert_eq!(p.phonemize("Sahne-", "de").await.unwrap(), "[sahne]-");
        assert_eq!(p.phonemize("-", "de").await.unwrap(), "-");
    }

    // --- failures ---

    #[tokio::test]
    async fn predictor_failure_fails_the_call() {
        let predictor = Arc::new(MockPredictor::failing(PredictorError::Request(
            "connection refused".into(),
        )));
        let p = phonemizer(predictor).with_dictionary(german(&[("Eis", "aɪ̯s")]));

        let err = p.phonemize("Eis Torte", "de").await.unwrap_err();
        assert!(matches!(err, PhonemizerError::Predictor(PredictorError::Request(_))));
    }

    #[tokio::test]
    async fn dictionary_only_text_survives_failing_predictor() {
        let predictor = Arc::new(MockPredictor::failing(PredictorError::Timeout));
        let p = phonemizer(predictor).with_dictionary(german(&[("Eis", "aɪ̯s")]));
        assert_eq!(p.phonemize("Eis, Eis", "de").await.unwrap(), "aɪ̯s, aɪ̯s");
    }

    // --- determinism and config ---

    #[tokio::test]
    async fn output_is_deterministic() {
        let p = phonemizer(Arc::new(MockPredictor::new()))
            .with_dictionary(german(&[("E-Mail", "ˈiːmeɪ̯l")]));
        let text = "Der E-Mail kleine SPD Prinzen-könig - Francesco Cardinale, pillert.";
        let first = p.phonemize(text, "de").await.unwrap();
        for _ in 0..5 {
            assert_eq!(p.phonemize(text, "de").await.unwrap(), first);
        }
    }

    #[tokio::test]
    async fn from_config_applies_text_settings() {
        let config = TextConfig {
            punctuation: ";".into(),
            expand_acronyms: false,
        };
        let predictor = Arc::new(MockPredictor::new());
        let p = Phonemizer::from_config(&config, Some(german(&[("Eis", "aɪ̯s")])), predictor.clone());

        assert_eq!(p.phonemize("Eis;ABC", "de").await.unwrap(), "aɪ̯s;[abc]");
        assert!(p.dictionary().is_some());
    }

    #[tokio::test]
    async fn unknown_language_falls_through_to_predictor() {
        let predictor = Arc::new(MockPredictor::new());
        let p = phonemizer(predictor.clone()).with_dictionary(german(&[("Eis", "aɪ̯s")]));
        assert_eq!(p.phonemize("Eis", "en_us").await.unwrap(), "[eis]");
        assert_eq!(predictor.call_count(), 1);
    }
}
